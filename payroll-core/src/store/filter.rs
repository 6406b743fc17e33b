use crate::models::EmployeeRecord;

/// Substring filter applied by [`EmployeeStore::query`](super::EmployeeStore::query).
///
/// `name` matches case-insensitively, `taxpayer_id` case-sensitively. An
/// empty pattern matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    pub name: String,
    pub taxpayer_id: String,
}

impl EmployeeFilter {
    pub fn new(
        name: impl Into<String>,
        taxpayer_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            taxpayer_id: taxpayer_id.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.taxpayer_id.is_empty()
    }

    pub fn matches(
        &self,
        record: &EmployeeRecord,
    ) -> bool {
        self.matcher().matches(record)
    }

    pub(crate) fn matcher(&self) -> FilterMatcher<'_> {
        FilterMatcher {
            name: self.name.to_lowercase(),
            taxpayer_id: &self.taxpayer_id,
        }
    }
}

/// A filter with its name pattern lowercased once, for scanning many records.
pub(crate) struct FilterMatcher<'a> {
    name: String,
    taxpayer_id: &'a str,
}

impl FilterMatcher<'_> {
    pub(crate) fn matches(
        &self,
        record: &EmployeeRecord,
    ) -> bool {
        record.name().to_lowercase().contains(&self.name)
            && record.taxpayer_id().contains(self.taxpayer_id)
    }
}
