// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Whole-program compilation tests.

use jackc_compiler::{CompileOptions, Error, compile, compile_with};
use rayon::prelude::*;

const SEVEN: &str = r#"
// Computes 1 + (2 * 3) and prints the result.
class Main {
   function void main() {
      do Output.printInt(1 + (2 * 3));
      return;
   }
}
"#;

const POINT: &str = r#"
/** A point in the plane. */
class Point {
    field int x, y;
    static int created;

    constructor Point new(int ax, int ay) {
        let x = ax;
        let y = ay;
        let created = created + 1;
        return this;
    }

    method int getX() { return x; }

    /* Manhattan distance to another point. */
    method int distance(Point other) {
        var int dx, dy;
        let dx = x - other.getX();
        if (dx < 0) { let dx = -dx; }
        let dy = y - other.getY();
        if (dy < 0) { let dy = -dy; }
        return dx + dy;
    }

    method void dispose() {
        do Memory.deAlloc(this);
        return;
    }
}
"#;

const SUM: &str = r#"
class Main {
    function void main() {
        var Array a;
        var int i, sum;
        let a = Array.new(3);
        let i = 0;
        while (i < 3) {
            let a[i] = i * i;
            let i = i + 1;
        }
        let i = 0;
        let sum = 0;
        while (~(i = 3)) {
            let sum = sum + a[i];
            let i = i + 1;
        }
        do Output.printString("sum=");
        do Output.printInt(sum);
        do a.dispose();
        return;
    }
}
"#;

fn lines(vm: &str) -> Vec<&str> {
    vm.lines().collect()
}

#[test]
fn test_seven() {
    let vm = compile(SEVEN).unwrap();
    assert_eq!(
        lines(&vm),
        [
            "function Main.main 0",
            "push constant 1",
            "push constant 2",
            "push constant 3",
            "call Math.multiply 2",
            "add",
            "call Output.printInt 1",
            "pop temp 0",
            "push constant 0",
            "return",
        ]
    );
}

#[test]
fn test_point_constructor_and_methods() {
    let vm = compile(POINT).unwrap();
    let vm = lines(&vm);

    assert_eq!(
        &vm[..13],
        [
            "function Point.new 0",
            "push constant 2",
            "call Memory.alloc 1",
            "pop pointer 0",
            "push argument 0",
            "pop this 0",
            "push argument 1",
            "pop this 1",
            "push static 0",
            "push constant 1",
            "add",
            "pop static 0",
            "push pointer 0",
        ]
    );

    let functions: Vec<&str> = vm
        .iter()
        .copied()
        .filter(|l| l.starts_with("function"))
        .collect();
    assert_eq!(
        functions,
        [
            "function Point.new 0",
            "function Point.getX 0",
            "function Point.distance 2",
            "function Point.dispose 0",
        ]
    );

    // other.getX() pushes the argument as receiver
    assert!(
        vm.windows(3)
            .any(|w| w == ["push this 0", "push argument 1", "call Point.getX 1"])
    );
    assert!(
        vm.windows(3)
            .any(|w| w == ["push pointer 0", "call Memory.deAlloc 1", "pop temp 0"])
    );
}

#[test]
fn test_labels_unique_within_class() {
    let vm = compile(POINT).unwrap();
    let labels: Vec<&str> = vm.lines().filter(|l| l.starts_with("label")).collect();
    let mut deduped = labels.clone();
    deduped.sort_unstable();
    deduped.dedup();
    assert_eq!(labels.len(), deduped.len());
    assert_eq!(labels, ["label L0", "label L1", "label L2", "label L3"]);
}

#[test]
fn test_array_program() {
    let vm = compile(SUM).unwrap();
    let vm = lines(&vm);

    assert_eq!(vm[0], "function Main.main 3");
    // let a[i] = i * i;
    assert!(vm.windows(10).any(|w| w
        == [
            "push local 0",
            "push local 1",
            "add",
            "pop pointer 1",
            "push local 1",
            "push local 1",
            "call Math.multiply 2",
            "pop that 0",
            "push local 1",
            "push constant 1",
        ]));
    assert!(vm.contains(&"call String.new 1"));
    assert_eq!(vm.iter().filter(|l| **l == "pop temp 0").count(), 3);
    assert_eq!(vm.last(), Some(&"return"));
}

#[test]
fn test_compilation_is_deterministic() {
    for src in [SEVEN, POINT, SUM] {
        assert_eq!(compile(src).unwrap(), compile(src).unwrap());
    }
}

#[test]
fn test_parallel_compilation_matches_sequential() {
    let sources = [SEVEN, POINT, SUM, SEVEN, POINT, SUM];
    let sequential: Vec<String> = sources.iter().map(|s| compile(s).unwrap()).collect();
    let parallel: Vec<String> = sources.par_iter().map(|s| compile(s).unwrap()).collect();
    assert_eq!(sequential, parallel);
}

#[test]
fn test_label_prefix_option() {
    let options = CompileOptions {
        label_prefix: "Point_".to_string(),
        ..Default::default()
    };
    let vm = compile_with(POINT, &options).unwrap();
    assert!(vm.contains("if-goto Point_0\n"));
    assert!(!vm.contains(" L0"));
}

#[test]
fn test_error_stops_compilation() {
    let broken = SEVEN.replace("return;", "retrun;");
    let err = compile(&broken).unwrap_err();
    assert!(matches!(err, Error::Syntax { .. }));
    assert_eq!(err.position().map(|p| p.line), Some(6));
}
