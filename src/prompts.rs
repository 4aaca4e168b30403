//! System prompts for the LLM accessibility pass.
//!
//! Every department prompt is rendered from one template, so rules for new
//! departments differ from the `saude` rule only in the department code and
//! display name. Keeping the text here lets tests inspect it without a
//! provider.
//!
//! The prompt is in Portuguese, the language of the pages being migrated;
//! the `aria-label` values the model writes must be in that language too.

/// Placeholder for the department code (`saude`, `seec`, ...).
const CODE_PLACEHOLDER: &str = "{code}";

/// Placeholder for the human-readable department name.
const NAME_PLACEHOLDER: &str = "{name}";

/// Template shared by every department rule.
///
/// `{code}` becomes the path segment shown in the examples and `{name}` the
/// name used in prose.
pub const DEPARTMENT_PROMPT_TEMPLATE: &str = r#"Você é um especialista em transformação de URLs e acessibilidade para a Secretaria de {name}.

Sua ÚNICA tarefa é modificar o HTML fornecido da seguinte forma:

1. Normalizar URLs:
   - Para links que contêm "/documents/" com arquivos PDF:
     - Converter para o formato: /documents/d/{code}/[nome-do-arquivo] (sem a extensão -pdf)
     - Exemplo: converter "<a href="/documents/37101/0/529%C2%AA+RE.pdf/...">529ª Reunião Extraordinária</a>" para "/documents/d/{code}/529-_re"
   - Normalizar caracteres especiais em URLs (converter acentos para versões sem acento)
   - Substituir espaços (_)
   - Substituir símbolos por underscores (_)
   - Se houver uma sequência de múltiplos hífens consecutivos (---- ou ---), substituí-los por um único hífen (-)
   - Se houver uma sequência de múltiplos + consecutivos (+++ ou ++++), substituí-los por um único hífen (-)

2. Adicionar atributos de acessibilidade APENAS para links:
   - Adicionar um atributo aria-label descritivo baseado no conteúdo do link
   - Exemplo: <a href="..." aria-label="Cronograma de reuniões do Conselho de {name} do Distrito Federal (CSDF) para o ano 2025.">

NÃO modifique outros elementos HTML.
NÃO altere a estrutura do documento.
NÃO adicione novos elementos.
NÃO modifique o conteúdo textual.

Forneça o HTML resultante mantendo exatamente a mesma estrutura, apenas com as URLs normalizadas e aria-labels adicionados aos links."#;

/// Display name used in the pre-registered `saude` prompt.
pub const SAUDE_DISPLAY_NAME: &str = "Saúde";

/// Render the prompt for one department.
pub fn render_department_prompt(code: &str, display_name: &str) -> String {
    DEPARTMENT_PROMPT_TEMPLATE
        .replace(CODE_PLACEHOLDER, code)
        .replace(NAME_PLACEHOLDER, display_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_filled() {
        let prompt = render_department_prompt("seec", "Seec");
        assert!(prompt.contains("Secretaria de Seec."));
        assert!(prompt.contains("/documents/d/seec/529-_re"));
        assert!(prompt.contains("Conselho de Seec do Distrito Federal"));
        assert!(!prompt.contains("{code}"));
        assert!(!prompt.contains("{name}"));
    }

    #[test]
    fn saude_prompt_uses_accented_name() {
        let prompt = render_department_prompt("saude", SAUDE_DISPLAY_NAME);
        assert!(prompt.starts_with(
            "Você é um especialista em transformação de URLs e acessibilidade para a Secretaria de Saúde."
        ));
        assert!(prompt.contains("/documents/d/saude/[nome-do-arquivo]"));
    }

    #[test]
    fn prompt_restricts_the_task() {
        let prompt = render_department_prompt("der", "Der");
        assert!(prompt.contains("aria-label"));
        assert!(prompt.contains("NÃO altere a estrutura do documento."));
    }
}
