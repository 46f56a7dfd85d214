//! A REPL session driven by a scripted line editor

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use skript_foundation::Result;
use skript_runtime::{LineEditor, ReadResult, Repl};

/// Replays queued input and records what reached the history.
#[derive(Clone, Default)]
struct Script {
    input: Rc<RefCell<VecDeque<ReadResult>>>,
    history: Rc<RefCell<Vec<String>>>,
    prompts: Rc<RefCell<Vec<String>>>,
}

impl Script {
    fn lines(lines: &[&str]) -> Self {
        let script = Self::default();
        script
            .input
            .borrow_mut()
            .extend(lines.iter().map(|l| ReadResult::Line((*l).to_string())));
        script
    }

    fn push(&self, read: ReadResult) {
        self.input.borrow_mut().push_back(read);
    }

    fn next(&self, prompt: &str) -> ReadResult {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.input.borrow_mut().pop_front().unwrap_or(ReadResult::Eof)
    }
}

impl LineEditor for Script {
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult> {
        Ok(self.next(prompt))
    }

    fn read_continuation(&mut self, prompt: &str) -> Result<ReadResult> {
        Ok(self.next(prompt))
    }

    fn add_history(&mut self, line: &str) {
        self.history.borrow_mut().push(line.to_string());
    }

    fn set_keywords(&mut self, _keywords: Vec<String>) {}
}

fn repl(script: &Script) -> Repl<Script> {
    Repl::with_editor(script.clone(), skript_stdlib::default_registry().unwrap())
        .without_banner()
        .with_colors(false)
}

#[test]
fn statements_blocks_and_commands() {
    let script = Script::lines(&[
        "set {_n} to 3",
        "print {_n} * 2",
        "on script load:",
        "    print {_n}",
        "",
        ":expr integers 1, 2 or 3",
        "give sword",
        ":quit",
        "print 4",
    ]);
    let mut repl = repl(&script);
    repl.run().unwrap();

    assert_eq!(
        *script.history.borrow(),
        [
            "set {_n} to 3",
            "print {_n} * 2",
            "on script load:\n    print {_n}\n",
            ":expr integers 1, 2 or 3",
            "give sword",
        ]
    );
    assert_eq!(repl.locals().collect::<Vec<_>>(), ["_n"]);
    assert_eq!(script.input.borrow().len(), 1);
}

#[test]
fn block_prompts_use_the_continuation_prompt() {
    let script = Script::lines(&["every 1 second:", "    print 1", ""]);
    let mut repl = repl(&script).with_prompt("> ");
    repl.run().unwrap();
    assert_eq!(*script.prompts.borrow(), ["> ", "..> ", "..> ", "> "]);
}

#[test]
fn interrupt_abandons_a_block() {
    let script = Script::lines(&["on script load:", "    print 1"]);
    script.push(ReadResult::Interrupted);
    script.push(ReadResult::Line("print 2".to_string()));
    let mut repl = repl(&script);
    repl.run().unwrap();
    assert_eq!(*script.history.borrow(), ["print 2"]);
}

#[test]
fn eof_inside_a_block_still_parses_it() {
    let script = Script::lines(&["on script load:", "    set {_x} to 1"]);
    let mut repl = repl(&script);
    repl.run().unwrap();
    assert_eq!(
        *script.history.borrow(),
        ["on script load:\n    set {_x} to 1"]
    );
    // Block entries have their own scope.
    assert_eq!(repl.locals().count(), 0);
}

#[test]
fn eval_output_matches_the_parse() {
    let script = Script::default();
    let mut repl = repl(&script).with_tree(false);
    assert_eq!(repl.eval("wait 2 ticks").unwrap(), "effect 'wait'\n");
    assert_eq!(repl.eval("7 is prime").unwrap(), "condition 'is prime'\n");
    let out = repl.eval("every 0 seconds:\n    print 1\n").unwrap();
    assert!(out.contains("longer than zero"), "{out}");
    assert!(out.ends_with("error: <repl>: 1 error\n"), "{out}");
}
