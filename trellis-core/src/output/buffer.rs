//! Block buffers: batched appends into a fresh child Range.

use crate::error::{Result, StructuralError};

use super::medium::Medium;
use super::output::Output;
use super::range::{Cursor, RangeId};

/// Builds the content of one block incrementally.
///
/// `push` queues a unit, `flush` writes the queue through [`Output::append`],
/// `close` flushes, finalizes the block and hands back its parent.
pub struct BlockBuffer<'a, M: Medium> {
    output: &'a mut Output<M>,
    range: RangeId,
    pending: Vec<M::Atom>,
    cursors: Vec<Cursor>,
}

impl<'a, M: Medium> BlockBuffer<'a, M> {
    /// Open a new block at the end of `parent`.
    pub fn open(output: &'a mut Output<M>, parent: RangeId) -> Result<Self> {
        let range = output.begin(parent)?;
        Ok(Self {
            output,
            range,
            pending: Vec::new(),
            cursors: Vec::new(),
        })
    }

    /// The block's Range.
    pub fn range(&self) -> RangeId {
        self.range
    }

    /// Write a block header now. Anything already queued is written first.
    pub fn head(&mut self, atom: M::Atom) -> Result<Cursor> {
        self.flush()?;
        let cursor = self.output.append(self.range, atom)?;
        self.cursors.push(cursor);
        Ok(cursor)
    }

    pub fn push(&mut self, atom: M::Atom) {
        self.pending.push(atom);
    }

    /// Number of queued units not yet written.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Cursors of every unit written so far, in order.
    pub fn cursors(&self) -> &[Cursor] {
        &self.cursors
    }

    pub fn flush(&mut self) -> Result<()> {
        for atom in std::mem::take(&mut self.pending) {
            let cursor = self.output.append(self.range, atom)?;
            self.cursors.push(cursor);
        }
        Ok(())
    }

    /// Flush, finalize the block and return its parent.
    pub fn close(mut self) -> Result<RangeId> {
        self.flush()?;
        let parent = self
            .output
            .tree()
            .parent(self.range)?
            .ok_or(StructuralError::CommitRoot)?;
        self.output.finalize(self.range)?;
        Ok(parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{ArrayMedium, RangeState};

    #[test]
    fn push_waits_for_flush() {
        let mut output = Output::new(ArrayMedium::new(0));
        let root = output.root();

        let mut block = BlockBuffer::open(&mut output, root).unwrap();
        block.push(1);
        block.push(2);
        assert_eq!(block.pending(), 2);
        block.flush().unwrap();
        assert_eq!(block.pending(), 0);
        assert_eq!(block.cursors().len(), 2);
        let range = block.range();
        assert_eq!(block.close(), Ok(root));

        assert_eq!(output.medium().items(), &[1, 2]);
        assert_eq!(output.tree().state(range), Ok(RangeState::Closed));
    }

    #[test]
    fn head_keeps_document_order() {
        let mut output = Output::new(ArrayMedium::new(0));
        let root = output.root();

        let mut block = BlockBuffer::open(&mut output, root).unwrap();
        block.push(1);
        block.head(10).unwrap();
        block.push(2);
        block.close().unwrap();

        assert_eq!(output.medium().items(), &[1, 10, 2]);
        assert_eq!(output.size(root), Ok(3));
    }

    #[test]
    fn empty_block_is_anchored() {
        let mut output = Output::new(ArrayMedium::new(-1));
        let root = output.root();

        BlockBuffer::open(&mut output, root)
            .unwrap()
            .close()
            .unwrap();
        assert_eq!(output.medium().items(), &[-1]);
    }
}
