    use super::*;
    use async_trait::async_trait;
    use replykit_protocols::GenerationError;

    struct MockProvider {
        id: ProviderId,
        api_key: String,
        language: LanguageId,
    }

    #[async_trait]
    impl ReplyProvider for MockProvider {
        fn id(&self) -> ProviderId {
            self.id
        }

        fn model(&self) -> &str {
            "mock-model"
        }

        async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            Ok(format!("{}:{}:{}", self.api_key, self.language, prompt))
        }

        async fn validate_key(&self) -> Result<(), GenerationError> {
            Ok(())
        }
    }

    struct MockFactory(ProviderId);

    impl ProviderFactory for MockFactory {
        fn id(&self) -> ProviderId {
            self.0
        }

        fn create(&self, api_key: &str, language: LanguageId) -> Arc<dyn ReplyProvider> {
            Arc::new(MockProvider {
                id: self.0,
                api_key: api_key.to_string(),
                language,
            })
        }
    }

    #[test]
    fn test_registry_creation() {
        let registry = ProviderRegistry::new();
        assert!(registry.list_ids().is_empty());
    }

    #[test]
    fn test_registry_default() {
        let registry = ProviderRegistry::default();
        assert!(registry.list_ids().is_empty());
    }

    #[test]
    fn test_register_factory() {
        let registry = ProviderRegistry::new();
        registry.register(Arc::new(MockFactory(ProviderId::Gemini))).unwrap();

        assert!(registry.contains(ProviderId::Gemini));
        assert!(registry.get(ProviderId::Gemini).is_some());
        assert!(registry.get(ProviderId::OpenAI).is_none());
    }

    #[test]
    fn test_register_duplicate() {
        let registry = ProviderRegistry::new();
        registry.register(Arc::new(MockFactory(ProviderId::Groq))).unwrap();

        let result = registry.register(Arc::new(MockFactory(ProviderId::Groq)));
        assert_eq!(result, Err(RegistryError::AlreadyRegistered(ProviderId::Groq)));
    }

    #[test]
    fn test_unregister() {
        let registry = ProviderRegistry::new();
        registry.register(Arc::new(MockFactory(ProviderId::Anthropic))).unwrap();

        registry.unregister(ProviderId::Anthropic).unwrap();
        assert!(!registry.contains(ProviderId::Anthropic));
        assert_eq!(
            registry.unregister(ProviderId::Anthropic),
            Err(RegistryError::NotFound(ProviderId::Anthropic))
        );
    }

    #[test]
    fn test_list_ids_follows_settings_order() {
        let registry = ProviderRegistry::new();
        for id in [ProviderId::Gemini, ProviderId::OpenAI, ProviderId::Groq] {
            registry.register(Arc::new(MockFactory(id))).unwrap();
        }
        let expected: Vec<_> = ProviderId::ALL
            .iter()
            .copied()
            .filter(|id| *id != ProviderId::Anthropic)
            .collect();
        assert_eq!(registry.list_ids(), expected);
    }

    #[tokio::test]
    async fn test_create_binds_key_and_language() {
        let registry = ProviderRegistry::new();
        registry.register(Arc::new(MockFactory(ProviderId::OpenAI))).unwrap();

        let provider = registry.create(ProviderId::OpenAI, "sk-test", LanguageId::En).unwrap();
        assert_eq!(provider.id(), ProviderId::OpenAI);
        assert_eq!(provider.generate("hi").await.unwrap(), "sk-test:en:hi");
        assert!(registry.create(ProviderId::Groq, "k", LanguageId::Fr).is_none());
    }
