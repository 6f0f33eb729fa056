//! Command output, as plain text or as JSON documents shaped like the debug
//! API responses: a string, or an array of strings.

use hyper9_core::machine::{RunReport, StopReason};
use serde::Serialize;

#[derive(Clone, Copy, Debug)]
pub struct Output {
    pub json: bool,
}

impl Output {
    /// A block of text, e.g. a register listing or memory dump.
    pub fn text(&self, text: &str) {
        if self.json {
            print_json(&text);
        } else {
            print!("{text}");
            if !text.ends_with('\n') {
                println!();
            }
        }
    }

    /// One entry per line, e.g. disassembled operations.
    pub fn lines(&self, lines: &[String]) {
        if self.json {
            print_json(&lines);
        } else {
            for line in lines {
                println!("{line}");
            }
        }
    }

    pub fn run_summary(&self, summary: &RunSummary) {
        if self.json {
            print_json(summary);
        } else {
            println!(
                "stopped: {} after {} instructions ({:.0} instr/s)",
                summary.reason, summary.instructions, summary.instructions_per_second
            );
            print!("{}", summary.registers);
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("error: cannot encode output: {e}"),
    }
}

#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub reason: String,
    pub instructions: u64,
    pub instructions_per_second: f64,
    pub pc: String,
    pub registers: String,
    pub console: String,
}

impl RunSummary {
    pub fn from_report(report: &RunReport) -> Self {
        let disasm = report.machine.disassembler();
        Self {
            reason: describe(report.reason),
            instructions: report.instructions,
            instructions_per_second: report.instructions_per_second(),
            pc: format!("{:04X}", disasm.cpu().pc),
            registers: disasm.registers(),
            console: report.machine.console().output(),
        }
    }
}

pub fn describe(reason: StopReason) -> String {
    match reason {
        StopReason::Breakpoint(addr) => format!("breakpoint at ${addr:04X}"),
        StopReason::Limit => "instruction limit".to_string(),
        StopReason::Fault(e) => format!("fault: {e}"),
        StopReason::Requested => "stop requested".to_string(),
    }
}
