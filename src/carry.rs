use crate::ReassemblyError;

/// Holds the unterminated prefix of the element that straddles a chunk edge.
///
/// The buffer is never grown in place: each update allocates exactly the
/// number of bytes carried and drops the previous allocation.
#[derive(Debug, Default)]
pub struct CarryBuffer {
    bytes: Option<Box<[u8]>>,
}

impl CarryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the concatenation of `parts` as the new carry.
    pub fn replace(&mut self, parts: &[&[u8]]) -> Result<(), ReassemblyError> {
        let requested = parts
            .iter()
            .try_fold(0usize, |total, part| total.checked_add(part.len()))
            .ok_or(ReassemblyError::AllocationFailure { requested: usize::MAX })?;

        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(requested)
            .map_err(|_| ReassemblyError::AllocationFailure { requested })?;
        for part in parts {
            buffer.extend_from_slice(part);
        }

        self.bytes = if buffer.is_empty() {
            None
        } else {
            Some(buffer.into_boxed_slice())
        };
        Ok(())
    }

    pub fn take_and_clear(&mut self) -> Option<Box<[u8]>> {
        self.bytes.take()
    }

    pub fn clear(&mut self) {
        self.bytes = None;
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_none()
    }

    pub fn len(&self) -> usize {
        self.bytes.as_ref().map_or(0, |bytes| bytes.len())
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_allocates_exact_size() {
        let mut carry = CarryBuffer::new();
        carry.replace(&[b"{\"hin".as_slice(), b"ta\":".as_slice()]).unwrap();
        assert_eq!(carry.as_bytes(), b"{\"hinta\":");
        assert_eq!(carry.len(), 9);

        carry.replace(&[b"{".as_slice()]).unwrap();
        assert_eq!(carry.as_bytes(), b"{");
    }

    #[test]
    fn test_take_and_clear() {
        let mut carry = CarryBuffer::new();
        assert!(carry.is_empty());
        carry.replace(&[b"{\"a\"".as_slice()]).unwrap();
        assert_eq!(carry.take_and_clear().as_deref(), Some(&b"{\"a\""[..]));
        assert!(carry.is_empty());
        assert_eq!(carry.take_and_clear(), None);
    }

    #[test]
    fn test_replace_with_nothing_empties() {
        let mut carry = CarryBuffer::new();
        carry.replace(&[b"{".as_slice()]).unwrap();
        carry.replace(&[]).unwrap();
        assert!(carry.is_empty());
        assert_eq!(carry.len(), 0);
    }
}
