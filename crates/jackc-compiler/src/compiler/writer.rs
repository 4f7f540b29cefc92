// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Append-only VM code emitter.

use std::io::Write;

use tracing::trace;

use super::bytecode::{Command, Instruction, Segment};
use crate::Result;

/// Writes one VM instruction per call, in call order.
///
/// Nothing is ever rewritten or reordered once written.
pub struct VmWriter<W: Write> {
    out: W,
    written: usize,
}

impl<W: Write> VmWriter<W> {
    /// Creates a writer appending to `out`.
    pub fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    /// Appends `instruction` as one line.
    pub fn write(&mut self, instruction: &Instruction) -> Result<()> {
        trace!(%instruction, "emit");
        writeln!(self.out, "{}", instruction)?;
        self.written += 1;
        Ok(())
    }

    /// `push segment index`
    pub fn write_push(&mut self, segment: Segment, index: u16) -> Result<()> {
        self.write(&Instruction::Push(segment, index))
    }

    /// `pop segment index`
    pub fn write_pop(&mut self, segment: Segment, index: u16) -> Result<()> {
        self.write(&Instruction::Pop(segment, index))
    }

    /// An arithmetic/logical command.
    pub fn write_arithmetic(&mut self, command: Command) -> Result<()> {
        self.write(&Instruction::Arithmetic(command))
    }

    /// `label L`
    pub fn write_label(&mut self, label: &str) -> Result<()> {
        self.write(&Instruction::Label(label.to_string()))
    }

    /// `goto L`
    pub fn write_goto(&mut self, label: &str) -> Result<()> {
        self.write(&Instruction::Goto(label.to_string()))
    }

    /// `if-goto L`
    pub fn write_if_goto(&mut self, label: &str) -> Result<()> {
        self.write(&Instruction::IfGoto(label.to_string()))
    }

    /// `call name argCount`
    pub fn write_call(&mut self, name: &str, args: u16) -> Result<()> {
        self.write(&Instruction::Call(name.to_string(), args))
    }

    /// `function name localCount`
    pub fn write_function(&mut self, name: &str, locals: u16) -> Result<()> {
        self.write(&Instruction::Function(name.to_string(), locals))
    }

    /// `return`
    pub fn write_return(&mut self) -> Result<()> {
        self.write(&Instruction::Return)
    }

    /// Number of instructions written so far.
    pub fn instructions_written(&self) -> usize {
        self.written
    }

    /// Flushes and returns the underlying sink.
    pub fn into_inner(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_one_line_per_call_in_order() {
        let mut writer = VmWriter::new(Vec::new());
        writer.write_function("Main.main", 1).unwrap();
        writer.write_push(Segment::Constant, 0).unwrap();
        writer.write_pop(Segment::Local, 0).unwrap();
        writer.write_label("L0").unwrap();
        writer.write_if_goto("L0").unwrap();
        writer.write_goto("L0").unwrap();
        writer.write_arithmetic(Command::Not).unwrap();
        writer.write_call("Sys.halt", 0).unwrap();
        writer.write_return().unwrap();
        assert_eq!(writer.instructions_written(), 9);

        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(
            text,
            "function Main.main 1\n\
             push constant 0\n\
             pop local 0\n\
             label L0\n\
             if-goto L0\n\
             goto L0\n\
             not\n\
             call Sys.halt 0\n\
             return\n"
        );
    }

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("sink closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sink_failure_is_io_error() {
        let mut writer = VmWriter::new(FailingSink);
        let err = writer.write_return().unwrap_err();
        assert!(matches!(err, Error::Io(msg) if msg.contains("sink closed")));
        assert_eq!(writer.instructions_written(), 0);
    }
}
