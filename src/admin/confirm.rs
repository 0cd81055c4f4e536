/// Answers a yes/no prompt before a destructive action
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// A pre-recorded answer, e.g. from a `confirm=true` query parameter
impl Confirm for bool {
    fn confirm(&mut self, _prompt: &str) -> bool {
        *self
    }
}

/// Interactive answer computed from the prompt text
pub struct Prompt<F>(pub F);

impl<F: FnMut(&str) -> bool> Confirm for Prompt<F> {
    fn confirm(&mut self, prompt: &str) -> bool {
        (self.0)(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_sees_the_question() {
        let mut asked = Vec::new();
        let mut prompt = Prompt(|question: &str| {
            asked.push(question.to_string());
            false
        });
        assert!(!prompt.confirm("Delete this project?"));
        drop(prompt);
        assert_eq!(asked, vec!["Delete this project?"]);
    }

    #[test]
    fn test_recorded_answer() {
        assert!(true.confirm("anything"));
        assert!(!false.confirm("anything"));
    }
}
