//! Restricted in-process Python on top of RustPython.
//!
//! Submissions get full language semantics but only the builtins named in
//! [`ALLOWED_BUILTINS`], plus a one-shot `input`. Module loading is gone:
//! `__import__` is removed and `sys.modules` is emptied, so every `import`
//! raises `ImportError`. Output goes to a capped in-memory sink.

use rustpython_vm::{
    builtins::PyBaseExceptionRef, Interpreter, PyObjectRef, PyResult, VirtualMachine,
};
use std::fmt;

use crate::error::Error;

/// File name shown in tracebacks.
pub const SOURCE_NAME: &str = "<submission>";

/// Stack reserved for threads that run submissions.
pub const WORKER_STACK_SIZE: usize = 256 * 1024 * 1024;

/// Captured output per run, in characters.
pub const MAX_OUTPUT: usize = 8 * 1024 * 1024;

pub const ALLOWED_BUILTINS: [&str; 19] = [
    "print", "range", "len", "int", "str", "float", "bool", "list", "dict", "set", "tuple",
    "sum", "min", "max", "sorted", "enumerate", "zip", "map", "filter",
];

const PRELUDE: &str = r#"
import builtins
import sys


class _Sink:
    def __init__(self, limit):
        self.parts = []
        self.size = 0
        self.limit = limit

    def write(self, text, _len=len, _overflow=MemoryError):
        self.size += _len(text)
        if self.size > self.limit:
            raise _overflow("output limit exceeded")
        self.parts.append(text)
        return _len(text)

    def flush(self):
        pass

    def getvalue(self):
        return "".join(self.parts)


def _begin(text):
    pending = [text]

    def input(prompt=""):
        if pending:
            return pending.pop()
        return ""

    builtins.input = input
    sink = _Sink(__LIMIT__)
    sys.stdout = sink
    return sink


def _restrict(allowed):
    namespace = builtins.__dict__
    for name in list(namespace):
        if name not in allowed:
            del namespace[name]
    sys.modules = {}


_restrict(__ALLOWED__)
"#;

fn prelude() -> String {
    let allowed = ALLOWED_BUILTINS
        .iter()
        .map(|name| format!("{:?}", name))
        .collect::<Vec<_>>()
        .join(", ");
    PRELUDE
        .replace("__LIMIT__", &MAX_OUTPUT.to_string())
        .replace("__ALLOWED__", &format!("({},)", allowed))
}

/// An uncaught exception together with whatever was printed before it.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub output: String,
    pub traceback: String,
}

impl Failure {
    /// The `Kind: message` line that ends the traceback.
    pub fn summary(&self) -> &str {
        self.traceback
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .unwrap_or_default()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.summary())
    }
}

fn render(vm: &VirtualMachine, exc: &PyBaseExceptionRef) -> String {
    let mut text = String::new();
    if vm.write_exception(&mut text, exc).is_err() || text.trim().is_empty() {
        return "RuntimeError: exception could not be formatted\n".to_string();
    }
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

fn captured(vm: &VirtualMachine, sink: &PyObjectRef) -> String {
    sink.get_attr("getvalue", vm)
        .and_then(|getvalue| getvalue.call((), vm))
        .and_then(|value| value.str(vm))
        .map(|value| value.as_str().to_owned())
        .unwrap_or_default()
}

/// A restricted interpreter ready to run submissions. Every run gets a
/// fresh global namespace.
pub struct Runtime<'vm> {
    vm: &'vm VirtualMachine,
    begin: PyObjectRef,
}

impl<'vm> Runtime<'vm> {
    fn install(vm: &'vm VirtualMachine) -> PyResult<Self> {
        let scope = vm.new_scope_with_builtins();
        vm.run_code_string(scope.clone(), &prelude(), "<runtime>".to_owned())?;
        let begin = scope.globals.get_item("_begin", vm)?;
        Ok(Self { vm, begin })
    }

    /// Runs `code` at module level. `input` is what the first `input()` call
    /// returns; later calls return an empty string.
    pub fn run(&self, code: &str, input: Option<&str>) -> Result<String, Failure> {
        let vm = self.vm;
        let text = vm.new_pyobj(input.unwrap_or_default().to_owned());
        let sink = self.begin.call((text,), vm).map_err(|exc| Failure {
            output: String::new(),
            traceback: render(vm, &exc),
        })?;

        let result = vm.run_code_string(vm.new_scope_with_builtins(), code, SOURCE_NAME.to_owned());
        let output = captured(vm, &sink);
        match result {
            Ok(_) => Ok(output),
            Err(exc) => Err(Failure {
                output,
                traceback: render(vm, &exc),
            }),
        }
    }
}

/// Starts a restricted interpreter on the current thread and hands it to
/// `f`. Call from a thread with [`WORKER_STACK_SIZE`] bytes of stack.
pub fn with_runtime<R>(f: impl FnOnce(&Runtime<'_>) -> R) -> Result<R, Error> {
    let interpreter = Interpreter::without_stdlib(Default::default());
    interpreter.enter(|vm| {
        let runtime = Runtime::install(vm).map_err(|exc| {
            Error::System(format!(
                "Failed to start Python runtime: {}",
                render(vm, &exc).trim_end()
            ))
        })?;
        Ok(f(&runtime))
    })
}
