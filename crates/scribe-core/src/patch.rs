//! Tri-state field updates.

/// An update to a nullable field.
///
/// `Absent` leaves the stored value untouched, `Null` clears it and
/// `Value` replaces it. Missing and `null` are deliberately distinct.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Patch<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    /// Apply this patch to a nullable slot.
    pub fn apply_to(self, slot: &mut Option<T>) {
        match self {
            Patch::Absent => {}
            Patch::Null => *slot = None,
            Patch::Value(v) => *slot = Some(v),
        }
    }

    pub fn as_ref(&self) -> Patch<&T> {
        match self {
            Patch::Absent => Patch::Absent,
            Patch::Null => Patch::Null,
            Patch::Value(v) => Patch::Value(v),
        }
    }
}

/// `None` = absent, `Some(None)` = null, `Some(Some(v))` = value.
impl<T> From<Option<Option<T>>> for Patch<T> {
    fn from(value: Option<Option<T>>) -> Self {
        match value {
            None => Patch::Absent,
            Some(None) => Patch::Null,
            Some(Some(v)) => Patch::Value(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_leaves_value_untouched() {
        let mut slot = Some("kept".to_string());
        Patch::Absent.apply_to(&mut slot);
        assert_eq!(slot.as_deref(), Some("kept"));
    }

    #[test]
    fn null_clears_value() {
        let mut slot = Some("gone".to_string());
        Patch::Null.apply_to(&mut slot);
        assert_eq!(slot, None);
    }

    #[test]
    fn value_replaces() {
        let mut slot = None;
        Patch::Value(7).apply_to(&mut slot);
        assert_eq!(slot, Some(7));
    }

    #[test]
    fn from_double_option() {
        assert_eq!(Patch::<u8>::from(None), Patch::Absent);
        assert_eq!(Patch::<u8>::from(Some(None)), Patch::Null);
        assert_eq!(Patch::from(Some(Some(1u8))), Patch::Value(1));
    }
}
