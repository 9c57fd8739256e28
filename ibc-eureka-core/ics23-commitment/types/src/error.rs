use displaydoc::Display;

#[derive(Debug, Display)]
pub enum CommitmentError {
    /// commitment proof cannot be empty
    EmptyCommitmentProof,
    /// merkle path needs at least one key
    EmptyMerklePath,
}

#[cfg(feature = "std")]
impl std::error::Error for CommitmentError {}
