//! Scripted bus and delay fakes for driver tests

use super::RegisterBus;
use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use std::collections::VecDeque;
use std::vec::Vec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nack;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
  Write { register: u8, value: u8 },
  Read { register: u8, len: usize },
}

struct Step {
  op: Op,
  reply: Result<Vec<u8>, Nack>,
}

/// Replays a fixed sequence of expected operations. Reads answer with the
/// scripted bytes, which may be shorter than the caller's buffer.
#[derive(Default)]
pub struct ScriptedBus {
  steps: VecDeque<Step>,
  log: Vec<Op>,
}

impl ScriptedBus {
  pub fn new() -> Self {
    ScriptedBus::default()
  }

  pub fn write(mut self, register: u8, value: u8) -> Self {
    self.push(Op::Write { register, value }, Ok(Vec::new()));
    self
  }

  pub fn write_nack(mut self, register: u8, value: u8) -> Self {
    self.push(Op::Write { register, value }, Err(Nack));
    self
  }

  pub fn read(mut self, register: u8, len: usize, reply: &[u8]) -> Self {
    self.push(Op::Read { register, len }, Ok(reply.to_vec()));
    self
  }

  pub fn read_nack(mut self, register: u8, len: usize) -> Self {
    self.push(Op::Read { register, len }, Err(Nack));
    self
  }

  fn push(&mut self, op: Op, reply: Result<Vec<u8>, Nack>) {
    self.steps.push_back(Step { op, reply });
  }

  pub fn transactions(&self) -> &[Op] {
    &self.log
  }

  pub fn done(&self) {
    assert_eq!(self.steps.len(), 0, "scripted operations left unconsumed");
  }

  fn next(&mut self, op: Op) -> Result<Vec<u8>, Nack> {
    self.log.push(op.clone());
    let step = match self.steps.pop_front() {
      Some(step) => step,
      None => panic!("unexpected bus operation {:?}", op),
    };
    assert_eq!(step.op, op);
    step.reply
  }
}

impl RegisterBus for ScriptedBus {
  type Error = Nack;

  fn write(&mut self, register: u8, value: u8) -> Result<(), Nack> {
    self.next(Op::Write { register, value }).map(|_| ())
  }

  fn read(&mut self, register: u8, buf: &mut [u8]) -> Result<usize, Nack> {
    let reply = self.next(Op::Read {
      register,
      len: buf.len(),
    })?;
    let n = core::cmp::min(reply.len(), buf.len());
    buf[..n].copy_from_slice(&reply[..n]);
    Ok(n)
  }
}

/// Records every requested pause, in microseconds, without sleeping.
#[derive(Default)]
pub struct RecordingDelay {
  pub pauses_us: Vec<u32>,
}

impl DelayUs<u32> for RecordingDelay {
  fn delay_us(&mut self, us: u32) {
    self.pauses_us.push(us);
  }
}

impl DelayMs<u32> for RecordingDelay {
  fn delay_ms(&mut self, ms: u32) {
    self.pauses_us.push(ms.saturating_mul(1000));
  }
}
