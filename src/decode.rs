use dialog_engine_types::value::encode_str_into;

use crate::cursor::Cursor;
use crate::error::DecodeError;

/// One conditional statement block, opaque to the decoder. The predicate
/// evaluator owns the interior format.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// Source position within the compiled dialog, 0-based.
    pub index: usize,
    pub bytes: Vec<u8>,
}

/// The decoded framing of a compiled dialog body: the unconditional
/// always-exec reference plus the conditional blocks in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledDialog {
    pub always_key: Option<String>,
    pub statements: Vec<Statement>,
}

/// Splits the leading `dialogEnd` byte off a compiled dialog blob.
///
/// 1 marks a terminal node; the caller clears its current-dialog pointer
/// before handing the remaining body to [`decode`].
pub fn split_dialog_end(blob: &[u8]) -> Result<(bool, &[u8]), DecodeError> {
    match blob.split_first() {
        Some((&flag, body)) => Ok((flag == 1, body)),
        None => Err(DecodeError::Empty),
    }
}

/// Decodes the body framing in a single linear pass.
///
/// Layout, little-endian: `alwaysKeyLen: u16` + key bytes (zero length
/// means no always-exec), `statementCount: u8`, then per statement
/// `blockLen: u64` + block bytes.
pub fn decode(body: &[u8]) -> Result<CompiledDialog, DecodeError> {
    if body.is_empty() {
        return Err(DecodeError::Empty);
    }
    let mut cursor = Cursor::new(body);

    let always_key = match cursor.read_string()? {
        key if key.is_empty() => None,
        key => Some(key),
    };

    let count = cursor.read_u8()? as usize;
    let mut statements = Vec::with_capacity(count);
    for index in 0..count {
        let block_len = cursor.read_u64()?;
        if block_len > cursor.remaining() as u64 {
            return Err(DecodeError::Truncated {
                offset: cursor.position(),
                needed: block_len as usize,
                remaining: cursor.remaining(),
            });
        }
        let bytes = cursor.read_bytes(block_len as usize)?.to_vec();
        statements.push(Statement { index, bytes });
    }

    Ok(CompiledDialog {
        always_key,
        statements,
    })
}

/// Encode side of the body framing, for fixtures and round-trip tests.
/// Dialog compilation proper happens upstream of this crate.
#[derive(Debug, Default)]
pub struct CompiledDialogBuilder {
    dialog_end: bool,
    always_key: Option<String>,
    statements: Vec<Vec<u8>>,
}

impl CompiledDialogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dialog_end(mut self, end: bool) -> Self {
        self.dialog_end = end;
        self
    }

    pub fn always_key(mut self, key: impl Into<String>) -> Self {
        self.always_key = Some(key.into());
        self
    }

    pub fn statement(mut self, block: Vec<u8>) -> Self {
        self.statements.push(block);
        self
    }

    /// Produces the full blob, leading `dialogEnd` byte included.
    pub fn encode(self) -> Vec<u8> {
        let mut out = vec![u8::from(self.dialog_end)];
        match &self.always_key {
            Some(key) => encode_str_into(key, &mut out),
            None => out.extend_from_slice(&0u16.to_le_bytes()),
        }
        out.push(u8::try_from(self.statements.len()).expect("more than 255 statements"));
        for block in &self.statements {
            out.extend_from_slice(&(block.len() as u64).to_le_bytes());
            out.extend_from_slice(block);
        }
        out
    }
}
