use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{info, warn};

use crate::form::{FormInput, MissingInput};

/// Anything that can turn a prompt into a single text completion.
#[async_trait]
pub trait FeedbackProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Raw model output, shown as-is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackResult {
    pub text: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum GenerateOutcome {
    Provided,
    AlreadyProvided,
    Rejected(MissingInput),
}

/// One student's form plus the feedback currently on screen.
///
/// The session is `Idle` while `feedback` is `None` and `ResultShown` otherwise,
/// so the "feedback provided" flag can never disagree with what is displayed.
#[derive(Clone, Debug, Default)]
pub struct Session {
    form: FormInput,
    feedback: Option<FeedbackResult>,
}

impl Session {
    pub fn new(form: FormInput) -> Self {
        Self {
            form,
            feedback: None,
        }
    }

    pub fn form(&self) -> &FormInput {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormInput {
        &mut self.form
    }

    pub fn feedback(&self) -> Option<&FeedbackResult> {
        self.feedback.as_ref()
    }

    pub fn feedback_provided(&self) -> bool {
        self.feedback.is_some()
    }

    pub async fn generate<P>(&mut self, provider: &P) -> Result<GenerateOutcome>
    where
        P: FeedbackProvider + ?Sized,
    {
        if self.feedback_provided() {
            return Ok(GenerateOutcome::AlreadyProvided);
        }

        let prompt = match self.form.validate() {
            Ok(input) => input.prompt(),
            Err(missing) => {
                warn!("generate rejected, missing fields: {:?}", missing.fields);
                return Ok(GenerateOutcome::Rejected(missing));
            }
        };

        info!("requesting feedback, prompt is {} bytes", prompt.len());
        let text = provider
            .complete(&prompt)
            .await
            .context("Failed to get feedback on the essay")?;
        info!("feedback received, {} bytes", text.len());

        self.feedback = Some(FeedbackResult { text });
        Ok(GenerateOutcome::Provided)
    }

    pub fn restart(&mut self) -> bool {
        if self.feedback.take().is_none() {
            return false;
        }
        self.form.clear_writing();
        info!("session restarted");
        true
    }
}
