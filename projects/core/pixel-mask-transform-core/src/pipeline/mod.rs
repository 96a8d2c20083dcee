//! Ordered transform pipelines.
//!
//! A [`Pipeline`] is a declarative list of [`PipelineStep`]s. Encoding applies
//! each step's forward operation in list order; decoding applies each step's
//! inverse in reverse order:
//!
//! | Step                | Inverse             |
//! |---------------------|---------------------|
//! | `XorKey(k)`         | `XorKey(k)`         |
//! | `XorBuffer(r)`      | `XorBuffer(r)`      |
//! | `RotateRight(n)`    | `RotateLeft(n)`     |
//! | `RotateLeft(n)`     | `RotateRight(n)`    |
//! | `Mask(op)`          | reverse correction  |
//! | shifts, `Gradient`  | none                |
//!
//! A pipeline holding a step without an inverse refuses to decode before any
//! byte is touched.
//!
//! For a pipeline built only from invertible steps, `decode(encode(b)) == b`
//! as long as every mask record describes the bytes its region holds at the
//! point the mask step runs (see [`crate::MaskRecord::capture`]).

mod identify;
mod stage;

pub use identify::*;
pub use stage::*;

use crate::buffer::ByteBuffer;
use crate::error::PipelineError;
use alloc::vec::Vec;
use core::convert::Infallible;
use core::fmt::Debug;
use log::debug;

/// An ordered list of steps with a forward (encode) and reverse (decode) mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pipeline {
    steps: Vec<PipelineStep>,
}

impl Pipeline {
    /// Creates an empty pipeline. Encoding and decoding it returns the input unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a pipeline from an existing list of steps.
    pub fn from_steps(steps: Vec<PipelineStep>) -> Self {
        Self { steps }
    }

    /// Appends a step.
    pub fn push(&mut self, step: impl Into<PipelineStep>) {
        self.steps.push(step.into());
    }

    /// Appends a step, builder style.
    pub fn with(mut self, step: impl Into<PipelineStep>) -> Self {
        self.push(step);
        self
    }

    /// The steps in encode order.
    pub fn steps(&self) -> &[PipelineStep] {
        &self.steps
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the pipeline has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether every step can be undone.
    pub fn is_invertible(&self) -> bool {
        self.steps.iter().all(PipelineStep::is_invertible)
    }

    /// Checks that [`Pipeline::decode`] can run.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::NotInvertible`] naming the first step without an inverse
    pub fn check_invertible<E: Debug>(&self) -> Result<(), PipelineError<E>> {
        match self
            .steps
            .iter()
            .enumerate()
            .find(|(_, step)| !step.is_invertible())
        {
            Some((index, step)) => Err(PipelineError::NotInvertible {
                index,
                stage: step.name(),
            }),
            None => Ok(()),
        }
    }

    /// Runs every step forward, in order.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Stage`] naming the first step that failed
    pub fn encode(&self, buffer: ByteBuffer) -> Result<ByteBuffer, PipelineError> {
        self.encode_with(buffer, |_, _, _| Ok::<(), Infallible>(()))
    }

    /// Runs every step forward, in order, calling `observer` with the step index,
    /// the step and the buffer after each step.
    ///
    /// The observer is how callers materialize intermediates; an error from it
    /// stops the pipeline.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Stage`] naming the first step that failed
    /// - [`PipelineError::Observer`] if `observer` failed
    pub fn encode_with<E, F>(
        &self,
        mut buffer: ByteBuffer,
        mut observer: F,
    ) -> Result<ByteBuffer, PipelineError<E>>
    where
        E: Debug,
        F: FnMut(usize, &PipelineStep, &ByteBuffer) -> Result<(), E>,
    {
        for (index, step) in self.steps.iter().enumerate() {
            debug!("encode step {index}: {}", step.name());
            step.forward(&mut buffer)
                .map_err(|source| PipelineError::Stage {
                    index,
                    stage: step.name(),
                    source,
                })?;
            observer(index, step, &buffer).map_err(PipelineError::Observer)?;
        }

        Ok(buffer)
    }

    /// Undoes every step, last step first.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::NotInvertible`] if any step lacks an inverse; raised
    ///   before the buffer is modified
    /// - [`PipelineError::Stage`] naming the first step that failed
    pub fn decode(&self, buffer: ByteBuffer) -> Result<ByteBuffer, PipelineError> {
        self.decode_with(buffer, |_, _, _| Ok::<(), Infallible>(()))
    }

    /// Undoes every step, last step first, calling `observer` after each one.
    ///
    /// The index passed to `observer` is the step's position in encode order.
    ///
    /// # Errors
    ///
    /// Same as [`Pipeline::decode`], plus [`PipelineError::Observer`].
    pub fn decode_with<E, F>(
        &self,
        mut buffer: ByteBuffer,
        mut observer: F,
    ) -> Result<ByteBuffer, PipelineError<E>>
    where
        E: Debug,
        F: FnMut(usize, &PipelineStep, &ByteBuffer) -> Result<(), E>,
    {
        self.check_invertible::<E>()?;

        for (index, step) in self.steps.iter().enumerate().rev() {
            debug!("decode step {index}: {}", step.name());
            step.inverse(&mut buffer)
                .map_err(|source| PipelineError::Stage {
                    index,
                    stage: step.name(),
                    source,
                })?;
            observer(index, step, &buffer).map_err(PipelineError::Observer)?;
        }

        Ok(buffer)
    }
}

impl FromIterator<PipelineStep> for Pipeline {
    fn from_iter<I: IntoIterator<Item = PipelineStep>>(iter: I) -> Self {
        Self::from_steps(iter.into_iter().collect())
    }
}
