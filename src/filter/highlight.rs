/// A piece of a message, either plain or covered by a highlight term
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment<'a> {
    pub text: &'a str,
    pub highlighted: bool,
}

/// Literal terms to find and mark in record messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Highlights {
    pub terms: Vec<String>,
}

impl Highlights {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Highlights {
            terms: terms
                .into_iter()
                .map(Into::into)
                .filter(|term: &String| !term.is_empty())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Mark every occurrence of every term in the message
    ///
    /// Returns the message split into fragments and whether any term was
    /// found. Every term is searched in the unmarked message, so a later term
    /// never matches inside markup added for an earlier one. Occurrences of
    /// different terms may overlap; instead of nesting highlights in the order
    /// the terms were given, the union of all matches is marked as one flat
    /// highlight. Without a match the message comes back as a single plain
    /// fragment.
    pub fn apply<'a>(&self, message: &'a str) -> (Vec<Fragment<'a>>, bool) {
        let mut marked = vec![false; message.len()];
        let mut found = false;

        for term in &self.terms {
            for (start, matched) in message.match_indices(term.as_str()) {
                marked[start..start + matched.len()].fill(true);
                found = true;
            }
        }

        if !found {
            return (
                vec![Fragment {
                    text: message,
                    highlighted: false,
                }],
                false,
            );
        }

        let mut fragments = Vec::new();
        let mut start = 0;

        for idx in 1..=message.len() {
            if idx == message.len() || marked[idx] != marked[start] {
                fragments.push(Fragment {
                    text: &message[start..idx],
                    highlighted: marked[start],
                });
                start = idx;
            }
        }

        (fragments, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marked_text(fragments: &[Fragment<'_>]) -> String {
        fragments
            .iter()
            .map(|f| {
                if f.highlighted {
                    format!("[{}]", f.text)
                } else {
                    f.text.to_string()
                }
            })
            .collect()
    }

    #[test]
    fn test_marks_every_occurrence() {
        let highlights = Highlights::new(["fail"]);
        let (fragments, found) = highlights.apply("task fail: fail again");
        assert!(found);
        assert_eq!(marked_text(&fragments), "task [fail]: [fail] again");
    }

    #[test]
    fn test_no_match_returns_message_unchanged() {
        let highlights = Highlights::new(["fail"]);
        let (fragments, found) = highlights.apply("all good");
        assert!(!found);
        assert_eq!(
            fragments,
            vec![Fragment {
                text: "all good",
                highlighted: false
            }]
        );
    }

    #[test]
    fn test_multiple_terms_apply() {
        let highlights = Highlights::new(["update", "insert"]);
        let (fragments, found) = highlights.apply("insert then update");
        assert!(found);
        assert_eq!(marked_text(&fragments), "[insert] then [update]");
    }

    #[test]
    fn test_overlapping_terms_merge() {
        let highlights = Highlights::new(["abc", "cde"]);
        let (fragments, _) = highlights.apply("xabcdex");
        assert_eq!(marked_text(&fragments), "x[abcde]x");
    }

    #[test]
    fn test_whole_message_and_unicode() {
        let highlights = Highlights::new(["ошибка"]);
        let (fragments, found) = highlights.apply("ошибка");
        assert!(found);
        assert_eq!(marked_text(&fragments), "[ошибка]");
    }

    #[test]
    fn test_empty_terms_are_ignored() {
        let highlights = Highlights::new(["", ""]);
        assert!(highlights.is_empty());
        let (_, found) = highlights.apply("text");
        assert!(!found);
    }
}
