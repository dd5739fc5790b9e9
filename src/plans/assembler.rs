use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::{
    context::PlanContext,
    document::{interpret_response, PlanDocument},
    fallback::fallback_plan,
    generator::PlanGenerator,
    prompt::build_request,
};

/// Produces a plan document for a context. Never fails: generator problems
/// degrade to the fallback plan.
#[derive(Clone)]
pub struct PlanAssembler {
    generator: Arc<dyn PlanGenerator>,
}

impl PlanAssembler {
    pub fn new(generator: Arc<dyn PlanGenerator>) -> Self {
        Self { generator }
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_configured()
    }

    #[instrument(skip_all, fields(goal_class = ?ctx.goal_class()))]
    pub async fn assemble(&self, ctx: &PlanContext) -> PlanDocument {
        if !self.generator.is_configured() {
            info!("generator not configured; using fallback plan");
            return fallback_plan(ctx);
        }

        let payload = build_request(ctx);
        match self.generator.generate(&payload).await {
            Ok(raw) => interpret_response(&raw, ctx),
            Err(e) => {
                warn!(error = %e, "plan generation failed; using fallback plan");
                fallback_plan(ctx)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::plans::{
        document::PlanSource,
        generator::{GenerationError, UnconfiguredGenerator},
        prompt::PromptPayload,
    };
    use crate::profiles::{AccountType, Profile};

    struct CannedGenerator(&'static str);

    #[async_trait]
    impl PlanGenerator for CannedGenerator {
        fn is_configured(&self) -> bool {
            true
        }

        async fn generate(&self, _payload: &PromptPayload) -> Result<String, GenerationError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl PlanGenerator for FailingGenerator {
        fn is_configured(&self) -> bool {
            true
        }

        async fn generate(&self, _payload: &PromptPayload) -> Result<String, GenerationError> {
            Err(GenerationError::Api {
                status: 503,
                message: "overloaded".into(),
            })
        }
    }

    #[derive(Default)]
    struct CountingGenerator(AtomicUsize);

    #[async_trait]
    impl PlanGenerator for CountingGenerator {
        fn is_configured(&self) -> bool {
            false
        }

        async fn generate(&self, _payload: &PromptPayload) -> Result<String, GenerationError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(GenerationError::NotConfigured)
        }
    }

    fn ctx() -> PlanContext {
        let mut p = Profile::new("c@e.com", "h", "Carlos", AccountType::User);
        p.age = Some(35);
        p.weight_kg = Some(85.0);
        p.height_cm = Some(178.0);
        p.goal = Some("ganhar massa".into());
        PlanContext::from_profile(&p)
    }

    #[tokio::test]
    async fn structured_reply_is_used() {
        let assembler = PlanAssembler::new(Arc::new(CannedGenerator(
            r#"{"breakfast":{},"lunch":{},"dinner":{}}"#,
        )));
        assert_eq!(assembler.assemble(&ctx()).await.source(), PlanSource::Structured);
    }

    #[tokio::test]
    async fn text_reply_degrades() {
        let assembler = PlanAssembler::new(Arc::new(CannedGenerator("Eat well.")));
        assert_eq!(
            assembler.assemble(&ctx()).await.source(),
            PlanSource::DegradedText
        );
    }

    #[tokio::test]
    async fn generator_failure_falls_back() {
        let assembler = PlanAssembler::new(Arc::new(FailingGenerator));
        assert_eq!(assembler.assemble(&ctx()).await.source(), PlanSource::Fallback);
    }

    #[tokio::test]
    async fn unconfigured_generator_is_never_called() {
        let counting = Arc::new(CountingGenerator::default());
        let assembler = PlanAssembler::new(counting.clone());
        assert_eq!(assembler.assemble(&ctx()).await.source(), PlanSource::Fallback);
        assert_eq!(counting.0.load(Ordering::SeqCst), 0);

        let assembler = PlanAssembler::new(Arc::new(UnconfiguredGenerator));
        assert!(!assembler.is_configured());
    }
}
