/// Test code samples for different languages
pub mod code_samples {
    pub const PYTHON_HELLO: &str = r#"print("Hello from Python!")"#;
    pub const JS_HELLO: &str = r#"console.log('Hello from JavaScript!')"#;
    pub const JAVA_HELLO: &str = r#"
        public class Main {
            public static void main(String[] args) {
                System.out.println("Hello from Java!");
            }
        }
    "#;
}

/// Test code samples for specific scenarios
pub mod test_scenarios {
    pub const PYTHON_MULTILINE: &str = r#"def factorial(n):
    if n <= 1:
        return 1
    return n * factorial(n - 1)

result = factorial(5)
print(f"Factorial of 5 is {result}")"#;

    pub const PYTHON_WITH_INPUT: &str = r#"name = input()
print(f"Hello, {name}!")"#;

    pub const PYTHON_SQUARE: &str = r#"n = int(input())
print(n * n)"#;

    pub const PYTHON_LEAKY_STATE: &str = r#"value = input()
if value == "first":
    remembered = value
print(remembered)"#;

    pub const PYTHON_INFINITE_LOOP: &str = r#"while True:
    pass"#;

    pub const PYTHON_RUNTIME_ERROR: &str = r#"print("started")
items = {"a": 1}
print(items["b"])"#;

    pub const PYTHON_ESCAPE_ATTEMPT: &str = r#"import os
print(os.listdir("/"))"#;

    pub const PYTHON_BIG_FACTORIAL: &str = r#"n = int(input())
result = 1
for i in range(2, n + 1):
    result *= i
print(result)"#;

    pub const PYTHON_SAFE_PARSE: &str = r#"try:
    n = int(input())
except:
    n = -1
print(n * 2)"#;

    pub const PYTHON_PRIME_CHECK: &str = r#"n = int(input())
for d in range(2, n):
    if n % d == 0:
        print("composite")
        break
else:
    print("prime")"#;

    pub const PYTHON_HEAD_AND_TAIL: &str = r#"first, *rest = map(int, input().split())
print("%d then %d more" % (first, len(rest)))"#;

    pub const JS_SQUARE: &str = r#"
        const n = Number(require('fs').readFileSync(0, 'utf8'));
        console.log(n * n);
    "#;

    pub const JS_WITH_TIMEOUT: &str = r#"
        setTimeout(() => {
            console.log('This should not print due to timeout');
        }, 6000);
    "#;
}
