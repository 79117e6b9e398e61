use std::ops::Deref;

/// An ordered list of texts ready to be sent for classification.
///
/// Batches read from files only ever hold trimmed, non-empty entries in
/// source order. Batches built from manual entries are passed through
/// untouched, empty slots included, since the operator edits those directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBatch {
    texts: Vec<String>,
}

impl TextBatch {
    /// Builds a batch from manually typed entries without trimming or filtering.
    ///
    /// # Example
    /// ```
    /// use sdg_classify::TextBatch;
    ///
    /// let batch = TextBatch::from_manual_entries(vec!["Great service", ""]);
    /// assert_eq!(batch.len(), 2);
    /// ```
    pub fn from_manual_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            texts: entries.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds a batch from file-derived candidates, keeping only entries that
    /// are non-empty after trimming.
    pub(crate) fn from_candidates<'a, I>(candidates: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self {
            texts: candidates
                .into_iter()
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(str::to_owned)
                .collect(),
        }
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    pub fn into_texts(self) -> Vec<String> {
        self.texts
    }
}

impl Deref for TextBatch {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.texts
    }
}
