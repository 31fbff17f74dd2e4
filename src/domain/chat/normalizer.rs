//! Flattens a provider response into an ordered list of answer texts

use std::iter::FusedIterator;
use std::slice;

use super::{ChatRole, Choice, ProviderResponse};
use crate::domain::DomainError;

/// Extract the generated texts from a response.
///
/// Choices are yielded in the order the provider returned them; `index` is
/// carried as metadata and never used for sorting. Fails with
/// [`DomainError::EmptyResponse`] when there are no choices.
pub fn extract(response: &ProviderResponse) -> Result<Answers<'_>, DomainError> {
    if response.choices.is_empty() {
        return Err(DomainError::EmptyResponse);
    }

    Ok(Answers {
        choices: response.choices.iter(),
    })
}

/// Lazy, one-shot sequence of answer texts borrowed from a response
#[derive(Debug, Clone)]
pub struct Answers<'a> {
    choices: slice::Iter<'a, Choice>,
}

impl<'a> Answers<'a> {
    /// Yield `(index, role, content)` instead of bare content
    pub fn with_metadata(self) -> impl Iterator<Item = (u32, ChatRole, &'a str)> {
        self.choices.map(|c| (c.index, c.role(), c.content()))
    }

    /// Materialize the remaining answers joined by `separator`
    pub fn join(self, separator: &str) -> String {
        self.collect::<Vec<_>>().join(separator)
    }
}

impl<'a> Iterator for Answers<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.choices.next().map(Choice::content)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.choices.size_hint()
    }
}

impl ExactSizeIterator for Answers<'_> {}

impl FusedIterator for Answers<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(choices: Vec<(u32, &str)>) -> ProviderResponse {
        ProviderResponse::new(
            choices
                .into_iter()
                .map(|(index, content)| Choice::new(index, ChatRole::Assistant, content))
                .collect(),
        )
    }

    #[test]
    fn test_extract_keeps_provider_order() {
        let response = response(vec![(2, "b"), (1, "a")]);

        let answers: Vec<&str> = extract(&response).unwrap().collect();
        assert_eq!(answers, vec!["b", "a"]);
    }

    #[test]
    fn test_extract_is_repeatable() {
        let response = response(vec![(0, "first"), (1, "second")]);

        let first: Vec<&str> = extract(&response).unwrap().collect();
        let second: Vec<&str> = extract(&response).unwrap().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_extract_empty_response() {
        let response = ProviderResponse::default();

        let result = extract(&response);
        assert!(matches!(result, Err(DomainError::EmptyResponse)));
    }

    #[test]
    fn test_join_and_metadata() {
        let response = response(vec![(0, "hi"), (1, "there")]);

        assert_eq!(extract(&response).unwrap().len(), 2);
        assert_eq!(extract(&response).unwrap().join("\n"), "hi\nthere");

        let meta: Vec<_> = extract(&response).unwrap().with_metadata().collect();
        assert_eq!(meta[1], (1, ChatRole::Assistant, "there"));
    }

    #[test]
    fn test_answers_are_one_shot() {
        let response = response(vec![(0, "only")]);
        let mut answers = extract(&response).unwrap();

        assert_eq!(answers.next(), Some("only"));
        assert_eq!(answers.next(), None);
        assert_eq!(answers.next(), None);
    }
}
