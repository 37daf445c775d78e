use crate::{CarryBuffer, OpenElement, ReassemblyError, ScanResult};

/// One element wrapped as a single-item JSON array: `[` + element + `]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    bytes: Vec<u8>,
}

impl Fragment {
    fn from_parts(head: &[u8], tail: &[u8]) -> Result<Self, ReassemblyError> {
        let requested = head
            .len()
            .checked_add(tail.len())
            .and_then(|element| element.checked_add(2))
            .ok_or(ReassemblyError::AllocationFailure { requested: usize::MAX })?;

        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(requested)
            .map_err(|_| ReassemblyError::AllocationFailure { requested })?;
        bytes.push(b'[');
        bytes.extend_from_slice(head);
        bytes.extend_from_slice(tail);
        bytes.push(b']');
        debug_assert_eq!(bytes.len(), requested);

        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The element bytes without the synthetic brackets.
    pub fn element(&self) -> &[u8] {
        &self.bytes[1..self.bytes.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

pub struct FragmentAssembler;

impl FragmentAssembler {
    /// Builds a fragment for every complete element in `scan` and leaves the
    /// open tail of `chunk`, if any, in `carry`.
    pub fn assemble(
        chunk: &[u8],
        scan: &ScanResult,
        carry: &mut CarryBuffer,
    ) -> Result<Vec<Fragment>, ReassemblyError> {
        let mut fragments = Vec::new();
        fragments
            .try_reserve_exact(scan.spans.len())
            .map_err(|_| ReassemblyError::AllocationFailure {
                requested: scan.spans.len() * std::mem::size_of::<Fragment>(),
            })?;

        for span in &scan.spans {
            let fragment = match span.start {
                Some(start) => Fragment::from_parts(&[], &chunk[start..span.end])?,
                None => {
                    let head = carry
                        .take_and_clear()
                        .ok_or(ReassemblyError::MalformedBoundary {
                            offset: 0,
                            reason: "element continuation without a carried prefix",
                        })?;
                    Fragment::from_parts(&head, &chunk[..span.end])?
                }
            };
            fragments.push(fragment);
        }

        match scan.open {
            Some(OpenElement::StartedAt(start)) => carry.replace(&[&chunk[start..]])?,
            Some(OpenElement::Continued) => {
                let head = carry.take_and_clear().unwrap_or_default();
                carry.replace(&[&head[..], chunk])?;
            }
            None => carry.clear(),
        }

        Ok(fragments)
    }
}
