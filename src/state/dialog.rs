/// Lifecycle of one modal, with the entity it is about.
///
/// Replaces the usual `open: bool` + `selected: Option<T>` pair so that "open
/// with nothing selected" and "closed but still selected" cannot happen.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum DialogState<T> {
    Closed,
    Viewing(T),
    Editing(T),
    Confirming(T),
}

impl<T> Default for DialogState<T> {
    fn default() -> Self {
        Self::Closed
    }
}

impl<T> DialogState<T> {
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing(_))
    }

    pub fn is_confirming(&self) -> bool {
        matches!(self, Self::Confirming(_))
    }

    pub fn entity(&self) -> Option<&T> {
        match self {
            Self::Closed => None,
            Self::Viewing(t) | Self::Editing(t) | Self::Confirming(t) => Some(t),
        }
    }

    pub fn into_entity(self) -> Option<T> {
        match self {
            Self::Closed => None,
            Self::Viewing(t) | Self::Editing(t) | Self::Confirming(t) => Some(t),
        }
    }

    /// Viewing -> Editing on the same entity; any other state is left alone.
    pub fn edit(self) -> Self {
        match self {
            Self::Viewing(t) => Self::Editing(t),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_closed() {
        let d: DialogState<String> = DialogState::default();
        assert!(!d.is_open());
        assert!(d.entity().is_none());
    }

    #[test]
    fn test_entity_is_carried_through_states() {
        let d = DialogState::Viewing("u1".to_string());
        assert_eq!(d.entity().map(String::as_str), Some("u1"));

        let d = d.edit();
        assert!(d.is_editing());
        assert_eq!(d.clone().into_entity().as_deref(), Some("u1"));

        let c = DialogState::Confirming(7);
        assert!(c.is_confirming());
        assert_eq!(c.clone().edit(), c);
    }
}
