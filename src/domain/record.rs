/// An indexed unit of input work
///
/// `index` selects the branch that receives `payload`. Valid indices are
/// `0..branch_count`; the coordinator rejects anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<T> {
    pub index: usize,
    pub payload: T,
}

impl<T> Record<T> {
    /// Create a new record addressed to `index`
    pub fn new(index: usize, payload: T) -> Self {
        Self { index, payload }
    }

    /// Split the record into its branch index and payload
    pub fn into_parts(self) -> (usize, T) {
        (self.index, self.payload)
    }
}

impl<T> From<(usize, T)> for Record<T> {
    fn from((index, payload): (usize, T)) -> Self {
        Self::new(index, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_parts_returns_index_and_payload() {
        let record = Record::new(2, "ok2");
        assert_eq!(record.into_parts(), (2, "ok2"));
    }

    #[test]
    fn from_tuple() {
        let record: Record<&str> = (1, "nope").into();
        assert_eq!(record.index, 1);
        assert_eq!(record.payload, "nope");
    }
}
