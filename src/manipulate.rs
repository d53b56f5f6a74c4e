//! Per-user prompt manipulation.
//!
//! A [`Manipulation`] wraps a user's prompt in a template before it is sent
//! to the image model. The alteration is additive: the original prompt is
//! always preserved verbatim inside the result, so the requester never
//! notices anything beyond oddly themed output. Users without rules get the
//! identity transform.

use std::collections::HashMap;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder in a template that is replaced with the original prompt.
pub const PROMPT_PLACEHOLDER: &str = "{prompt}";
/// Placeholder in a template that is replaced with a random choice.
pub const CHOICE_PLACEHOLDER: &str = "{choice}";

/// Errors raised by malformed manipulation rules.
///
/// These indicate a configuration bug, not a runtime condition: validated
/// configuration never produces them.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("manipulation template {template:?} is missing the {placeholder} placeholder")]
    MissingPlaceholder {
        template: String,
        placeholder: &'static str,
    },

    #[error("manipulation template {template:?} has an empty choice list")]
    NoChoices { template: String },
}

/// One prompt-rewriting rule: a template with `{prompt}` and `{choice}`
/// placeholders plus the pool of choices.
///
/// Template `"{choice} of {prompt}"` with choices `["oil painting",
/// "watercolor"]` yields results like `"watercolor of Darth Vader trying to
/// drink a milkshake"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manipulation {
    pub template: String,
    pub choices: Vec<String>,
}

impl Manipulation {
    pub fn new(template: impl Into<String>, choices: Vec<String>) -> Self {
        Self {
            template: template.into(),
            choices,
        }
    }

    /// Check the rule invariants: both placeholders present, at least one
    /// choice. Called once at configuration load.
    pub fn validate(&self) -> Result<(), TransformError> {
        for placeholder in [PROMPT_PLACEHOLDER, CHOICE_PLACEHOLDER] {
            if !self.template.contains(placeholder) {
                return Err(TransformError::MissingPlaceholder {
                    template: self.template.clone(),
                    placeholder,
                });
            }
        }
        if self.choices.is_empty() {
            return Err(TransformError::NoChoices {
                template: self.template.clone(),
            });
        }
        Ok(())
    }

    /// Alter `prompt` using this rule, drawing the choice from `rng`.
    pub fn alter(&self, prompt: &str, rng: &mut impl Rng) -> Result<String, TransformError> {
        let choice = self
            .choices
            .choose(rng)
            .ok_or_else(|| TransformError::NoChoices {
                template: self.template.clone(),
            })?;
        render(&self.template, prompt, choice)
    }
}

/// Substitute the placeholders in `template`.
///
/// Only the template is scanned for placeholders. The prompt and choice are
/// spliced in verbatim, so placeholder-like text inside the user's prompt
/// stays untouched.
fn render(template: &str, prompt: &str, choice: &str) -> Result<String, TransformError> {
    let mut out = String::with_capacity(template.len() + prompt.len() + choice.len());
    let mut rest = template;
    let mut saw_prompt = false;
    let mut saw_choice = false;

    loop {
        let next_prompt = rest.find(PROMPT_PLACEHOLDER);
        let next_choice = rest.find(CHOICE_PLACEHOLDER);
        let (index, placeholder, value) = match (next_prompt, next_choice) {
            (Some(p), Some(c)) if p < c => (p, PROMPT_PLACEHOLDER, prompt),
            (Some(_), Some(c)) => (c, CHOICE_PLACEHOLDER, choice),
            (Some(p), None) => (p, PROMPT_PLACEHOLDER, prompt),
            (None, Some(c)) => (c, CHOICE_PLACEHOLDER, choice),
            (None, None) => break,
        };
        out.push_str(&rest[..index]);
        out.push_str(value);
        if placeholder == PROMPT_PLACEHOLDER {
            saw_prompt = true;
        } else {
            saw_choice = true;
        }
        rest = &rest[index + placeholder.len()..];
    }
    out.push_str(rest);

    if !saw_prompt {
        return Err(TransformError::MissingPlaceholder {
            template: template.to_string(),
            placeholder: PROMPT_PLACEHOLDER,
        });
    }
    if !saw_choice {
        return Err(TransformError::MissingPlaceholder {
            template: template.to_string(),
            placeholder: CHOICE_PLACEHOLDER,
        });
    }
    Ok(out)
}

/// Mapping from user name to that user's manipulation rules.
///
/// Users absent from the mapping get an empty rule list, which makes
/// [`ManipulationSet::apply`] the identity transform for them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManipulationSet {
    rules: HashMap<String, Vec<Manipulation>>,
}

impl ManipulationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, user: impl Into<String>, rules: Vec<Manipulation>) {
        self.rules.insert(user.into(), rules);
    }

    pub fn rules_for(&self, user: &str) -> &[Manipulation] {
        self.rules.get(user).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.values().all(Vec::is_empty)
    }

    /// Validate every rule in the set.
    pub fn validate(&self) -> Result<(), TransformError> {
        for rules in self.rules.values() {
            for rule in rules {
                rule.validate()?;
            }
        }
        Ok(())
    }

    /// Transform `prompt` for `user`.
    ///
    /// Picks one of the user's rules uniformly at random, then one of the
    /// rule's choices, and substitutes both into the template. Users with no
    /// rules get the prompt back unchanged without touching the RNG.
    pub fn apply(
        &self,
        user: &str,
        prompt: &str,
        rng: &mut impl Rng,
    ) -> Result<String, TransformError> {
        let rules = self.rules_for(user);
        let Some(rule) = rules.choose(rng) else {
            return Ok(prompt.to_string());
        };
        rule.alter(prompt, rng)
    }
}
