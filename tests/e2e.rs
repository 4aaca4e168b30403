//! End-to-end tests against a live LLM provider.
//!
//! They make real API calls and are gated behind the `E2E_ENABLED`
//! environment variable so they do not run in CI unless explicitly requested.
//!
//! Run with:
//!   E2E_ENABLED=1 OPENAI_API_KEY=sk-... cargo test --test e2e -- --nocapture

use linkmigrate::{EnhanceConfig, Enhancement, LlmEnhancer, Migrator, RewriteOptions};

/// Skip this test unless E2E_ENABLED is set.
macro_rules! e2e_skip_unless_ready {
    () => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
    }};
}

const PAGE: &str = r#"<ul>
  <li><a href="/documents/37101/0/529%C2%AA+RE.pdf/abc">529ª Reunião Extraordinária</a></li>
  <li><a href="https://www.saude.df.gov.br/wp-conteudo/uploads/2024/Cronograma%20CSDF%202025.pdf">Cronograma de reuniões do CSDF para 2025</a></li>
</ul>"#;

fn live_migrator() -> Migrator<LlmEnhancer> {
    let config = EnhanceConfig::builder().build().unwrap();
    let enhancer = LlmEnhancer::from_config(&config).expect("no LLM provider configured");
    Migrator::new(enhancer)
}

#[tokio::test]
async fn test_enhance_adds_aria_labels() {
    e2e_skip_unless_ready!();

    let migrator = live_migrator();
    let options = RewriteOptions::builder()
        .normalize_special_chars(true)
        .relativize_links(true)
        .build()
        .unwrap();

    let out = migrator.migrate(PAGE, &options, true).await.unwrap();
    assert_eq!(out.rewrite.urls_normalized, 2);

    match &out.enhancement {
        Some(Enhancement::Enhanced { html }) => {
            println!("{html}");
            assert!(html.contains("aria-label"), "no aria-label in: {html}");
        }
        other => panic!("enhancement failed: {other:?}"),
    }
}

#[tokio::test]
async fn test_enhance_unknown_department() {
    e2e_skip_unless_ready!();

    let migrator = live_migrator();
    let options = RewriteOptions::builder().secretaria("seec").build().unwrap();

    let out = migrator.migrate(PAGE, &options, true).await.unwrap();
    assert!(out.rewrite.html.contains("/documents/d/seec/"));
    assert!(migrator.registry().get("seec").is_some());
    assert!(out.enhancement.is_some());
}
