use textkb_core::config::KbConfig;

#[test]
fn defaults_match_documented_constants() {
    let cfg = KbConfig::default();
    assert_eq!(cfg.chunking.size, 1200);
    assert_eq!(cfg.chunking.overlap, 200);
    assert_eq!(cfg.embed.batch_size, 96);
    assert_eq!(cfg.retrieval.top_k, 6);
    assert_eq!(cfg.retrieval.max_context_chars, 12_000);
    assert_eq!(cfg.summarize.max_docs, 24);
    assert_eq!(cfg.summarize.map_batch_size, 8);
    assert_eq!(cfg.provider.embed_model, "text-embedding-3-small");
    assert_eq!(cfg.provider.chat_model, "gpt-4o-mini");
}

#[test]
fn toml_and_env_override_defaults() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
                [chunking]
                size = 800

                [retrieval]
                top_k = 3
            "#,
        )?;
        jail.set_env("APP_CHUNKING__OVERLAP", "120");

        let cfg = KbConfig::load().expect("config loads");
        assert_eq!(cfg.chunking.size, 800);
        assert_eq!(cfg.chunking.overlap, 120);
        assert_eq!(cfg.retrieval.top_k, 3);
        // Untouched sections keep their defaults.
        assert_eq!(cfg.embed.batch_size, 96);
        Ok(())
    });
}

#[test]
fn zero_summarize_max_docs_is_rejected() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("APP_SUMMARIZE__MAX_DOCS", "0");
        assert!(KbConfig::load().is_err());
        Ok(())
    });
}

#[test]
fn overlap_not_below_size_is_rejected() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("APP_CHUNKING__SIZE", "100");
        jail.set_env("APP_CHUNKING__OVERLAP", "100");
        assert!(KbConfig::load().is_err());
        Ok(())
    });
}
