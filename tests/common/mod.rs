// Shared test helpers for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// A GoogleTest-like executable. Every case run records its arguments in
/// `<script>.args`.
///
/// Cases: `MathTest.Adds` passes, `MathTest.Overflows` reports two
/// failures, `MathTest.Crashes` dies by SIGSEGV, `MathTest.Hangs` never
/// finishes and `MathTest.Skipped` is skipped.
pub const GTEST_SCRIPT: &str = r##"#!/bin/sh
filter=""
out=""
for arg in "$@"; do
  case "$arg" in
    --help)
      echo "This program contains tests written using Google Test. You can use the"
      echo "following command line flags to control its behavior:"
      echo ""
      echo "  --gtest_list_tests"
      echo "      List the names of all tests instead of running them."
      exit 0
      ;;
    --gtest_list_tests)
      echo "Running main() from gtest_main.cc"
      echo "MathTest."
      echo "  Adds"
      echo "  Overflows"
      echo "  Crashes"
      echo "  Hangs"
      echo "  Skipped"
      exit 0
      ;;
    --gtest_filter=*) filter="${arg#--gtest_filter=}" ;;
    --gtest_output=json:*) out="${arg#--gtest_output=json:}" ;;
  esac
done
printf '%s\n' "$@" > "$0.args"
case "$filter" in
  MathTest.Adds)
    cat > "$out" <<'EOF'
{"testsuites":[{"name":"MathTest","testsuite":[{"name":"Adds","status":"RUN","result":"COMPLETED"}]}]}
EOF
    exit 0
    ;;
  MathTest.Overflows)
    cat > "$out" <<'EOF'
{"testsuites":[{"name":"MathTest","testsuite":[{"name":"Overflows","status":"RUN","result":"COMPLETED","failures":[{"failure":"math_test.cc:17\nExpected equality of these values:\n  add(2, 2)\n    Which is: 4\n  5","type":""},{"failure":"math_test.cc:21\nValue of: overflowed\n  Actual: false\nExpected: true","type":""}]}]}]}
EOF
    echo "[  FAILED  ] MathTest.Overflows"
    exit 1
    ;;
  MathTest.Crashes)
    echo "[ RUN      ] MathTest.Crashes"
    kill -SEGV $$
    ;;
  MathTest.Hangs)
    exec sleep 30
    ;;
  MathTest.Skipped)
    cat > "$out" <<'EOF'
{"testsuites":[{"name":"MathTest","testsuite":[{"name":"Skipped","status":"RUN","result":"SKIPPED","skipped":[{"message":"math_test.cc:40\nnot supported on this target"}]}]}]}
EOF
    exit 0
    ;;
esac
exit 0
"##;

/// A Boost.Test-like executable.
///
/// Cases: `MathSuite/adds` passes, `MathSuite/overflows` reports two
/// failures and `MathSuite/throws` escapes with an exception.
pub const BOOST_SCRIPT: &str = r##"#!/bin/sh
test=""
for arg in "$@"; do
  case "$arg" in
    --help)
      echo "Boost.Test module Math"
      echo "  --log_format, -f"
      echo "  --output_format, -o"
      echo "  --list_content"
      exit 0
      ;;
    --list_content)
      printf 'MathSuite*\n    adds*\n    overflows*\n    throws*: escapes with an exception\n' >&2
      exit 0
      ;;
    --run_test=*) test="${arg#--run_test=}" ;;
  esac
done
case "$test" in
  MathSuite/overflows)
    echo "Running 1 test case..."
    echo "math_test.cpp(10): error: in \"MathSuite/overflows\": check add(2, 2) == 5 has failed [4 != 5]"
    echo "math_test.cpp(12): error: in \"MathSuite/overflows\": check overflowed has failed"
    echo ""
    echo "*** 2 failures are detected in the test module \"Math\""
    exit 201
    ;;
  MathSuite/throws)
    echo "unknown location(0): fatal error: in \"MathSuite/throws\": std::runtime_error: boom"
    echo "math_test.cpp(20): last checkpoint: \"throws\" test entry"
    exit 200
    ;;
esac
exit 0
"##;

/// An executable whose listing always fails.
pub const BROKEN_GTEST_SCRIPT: &str = r##"#!/bin/sh
case "$1" in
  --help) echo "  --gtest_list_tests" ; exit 0 ;;
  --gtest_list_tests) echo "error while loading shared libraries: libgtest.so" >&2 ; exit 127 ;;
esac
exit 1
"##;

/// An executable that is not a test of any supported framework.
pub const PLAIN_SCRIPT: &str = "#!/bin/sh\necho \"usage: tool [options]\"\n";

/// An emulator that records every invocation in `<script>.log` and then runs
/// the wrapped command.
pub const EMULATOR_SCRIPT: &str = "#!/bin/sh\necho \"$@\" >> \"$0.log\"\nexec \"$@\"\n";

/// Writes `content` to `dir/name` with the given permission bits.
#[cfg(unix)]
pub fn write_script_with_mode(dir: &Path, name: &str, content: &str, mode: u32) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write script");
    fs::set_permissions(&path, fs::Permissions::from_mode(mode)).expect("Failed to set permissions");
    path
}

/// Writes an executable script to `dir/name`.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, content: &str) -> PathBuf {
    write_script_with_mode(dir, name, content, 0o755)
}

/// The arguments the GoogleTest-like script received on its last case run.
pub fn recorded_args(script: &Path) -> Vec<String> {
    let mut log = script.as_os_str().to_owned();
    log.push(".args");
    fs::read_to_string(PathBuf::from(log))
        .expect("Failed to read recorded arguments")
        .lines()
        .map(str::to_string)
        .collect()
}

/// A GoogleTest-like executable whose only case passes.
pub const PASSING_GTEST_SCRIPT: &str = r##"#!/bin/sh
out=""
for arg in "$@"; do
  case "$arg" in
    --help) echo "  --gtest_list_tests" ; exit 0 ;;
    --gtest_list_tests) printf 'Smoke.\n  Works\n' ; exit 0 ;;
    --gtest_output=json:*) out="${arg#--gtest_output=json:}" ;;
  esac
done
cat > "$out" <<'EOF'
{"testsuites":[{"name":"Smoke","testsuite":[{"name":"Works","status":"RUN","result":"COMPLETED"}]}]}
EOF
exit 0
"##;
