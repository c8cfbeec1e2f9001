//! Fuzz target: `CommandParser::parse` + `Validator::validate`
//!
//! Feeds arbitrary text through the parser and validator and asserts that
//! neither panics, that parsing is deterministic, and that only commands
//! naming a product can ever be admitted.
//!
//! cargo fuzz run fuzz_command_parser

#![no_main]

use cafe_dispenser::app::commands::{CommandKind, CommandParser};
use cafe_dispenser::app::validate::Validator;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let line = String::from_utf8_lossy(data);
    let parser = CommandParser::default();

    let cmd = parser.parse(&line);
    assert_eq!(cmd, parser.parse(&line), "parse must be deterministic");
    assert!(cmd.requested_secs.is_finite());

    let verdict = Validator::default().validate(&cmd);
    if verdict.valid {
        assert!(matches!(cmd.kind, CommandKind::Dispense(_)));
        assert!(verdict.reason.is_none());
    }
    if cmd.kind == CommandKind::Blank {
        assert!(!verdict.valid && verdict.reason.is_none());
    }
});
