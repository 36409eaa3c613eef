//! Framework de testes executados no alvo (feature `self_test`)

/// Resultado de teste
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestResult {
    Passed,
    Failed,
    Skipped,
}

/// Um caso de teste
pub struct TestCase {
    pub name: &'static str,
    pub func: fn() -> TestResult,
}

impl TestCase {
    pub const fn new(name: &'static str, func: fn() -> TestResult) -> Self {
        Self { name, func }
    }
}

/// Contagem final de uma suite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SuiteReport {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Executa suite de testes
pub fn run_test_suite(name: &str, tests: &[TestCase]) -> SuiteReport {
    crate::kinfo!("=== Executando suite de testes");
    // Os macros só imprimem literal + hex; nomes vão direto para o console
    crate::console::emit_str(name);
    crate::console::emit_nl();

    let mut report = SuiteReport::default();

    for test in tests {
        let result = (test.func)();
        let tag = match result {
            TestResult::Passed => {
                report.passed += 1;
                "[PASS] "
            }
            TestResult::Failed => {
                report.failed += 1;
                "[FAIL] "
            }
            TestResult::Skipped => {
                report.skipped += 1;
                "[SKIP] "
            }
        };
        crate::console::emit_str(tag);
        crate::console::emit_str(test.name);
        crate::console::emit_nl();
    }

    crate::kinfo!("Resultados: passed=", report.passed);
    if report.failed > 0 {
        crate::kerror!("Resultados: failed=", report.failed);
    }
    report
}
