//! End-to-end tests: package directories on disk in, generated files out.

use std::path::Path;
use std::sync::Arc;

use mixgen::core::{Config, FormatterKind};
use mixgen::generation::{
    GenerationError, GenerationOrchestrator, PackageOutcome, resolve_bindings,
};
use mixgen::infrastructure::generation::SyntaxCheckFormatter;
use mixgen::infrastructure::golang::PackageScanner;
use mixgen::infrastructure::output::FileSystemOutputService;
use mixgen::infrastructure::templates::TemplateCatalog;
use tempfile::TempDir;

const HEADER: &str = "// Code generated by mixgen. DO NOT EDIT.";

fn orchestrator() -> GenerationOrchestrator {
    let config = Config {
        formatter: FormatterKind::SyntaxCheck,
        ..Config::default()
    };
    GenerationOrchestrator::new(
        config,
        Arc::new(SyntaxCheckFormatter::new()),
        Arc::new(FileSystemOutputService::new()),
    )
}

fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

fn generated(dir: &Path) -> String {
    std::fs::read_to_string(dir.join("mixgen_gen.go")).unwrap()
}

#[tokio::test]
async fn test_single_binding_without_imports() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "bar.go", "package demo\n\ntype Bar struct {\n\tFoo\n}\n");
    write(dir.path(), "Foo.tmpl", "// for {{ Name }}\n");

    let outcome = orchestrator().generate_package(dir.path()).await.unwrap();
    assert_eq!(
        outcome,
        PackageOutcome::Written {
            path: dir.path().join("mixgen_gen.go"),
            fragments: 1,
            imports: 0,
        }
    );
    assert_eq!(
        generated(dir.path()),
        format!("{HEADER}\n\npackage demo\n\n// for Bar\n")
    );
}

#[tokio::test]
async fn test_add_import_produces_import_block() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "bar.go", "package demo\n\ntype Bar struct {\n\tFoo\n}\n");
    write(
        dir.path(),
        "Foo.tmpl",
        "{{ AddImport(path=\"net/http\") }}\nfunc (b *{{ Name }}) Method() string { return http.MethodGet }\n",
    );

    orchestrator().generate_package(dir.path()).await.unwrap();

    let content = generated(dir.path());
    assert!(content.contains("import (\n\t\"net/http\"\n)\n"));
    assert_eq!(content.matches("\"net/http\"").count(), 1);
    assert!(content.contains("func (b *Bar) Method() string { return http.MethodGet }"));
}

#[tokio::test]
async fn test_two_templates_two_fragments() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "bar.go",
        "package demo\n\ntype Bar struct {\n\tFoo\n\t*Baz\n\tName string `json:\"name\"`\n}\n",
    );
    write(dir.path(), "Foo.tmpl", "// Foo for {{ Name }}");
    write(
        dir.path(),
        "Baz.tmpl",
        "{% for f in Fields %}{% if not f.Embedded %}// {{ f.Name }} -> {{ f.Tags.json }}{% endif %}{% endfor %}",
    );

    let outcome = orchestrator().generate_package(dir.path()).await.unwrap();
    assert!(matches!(outcome, PackageOutcome::Written { fragments: 2, .. }));

    let content = generated(dir.path());
    let foo = content.find("// Foo for Bar").unwrap();
    let baz = content.find("// Name -> name").unwrap();
    assert!(foo < baz);
}

#[tokio::test]
async fn test_imports_deduplicated_and_sorted_across_contexts() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "a.go",
        "package demo\n\ntype A struct {\n\tFoo\n\tErr\n}\n",
    );
    write(dir.path(), "b.go", "package demo\n\ntype B struct {\n\tFoo\n}\n");
    write(
        dir.path(),
        "Foo.tmpl",
        "{{ AddImport(path=\"fmt\") }}{{ AddImport(path=\"fmt\") }}\nfunc (x {{ Name }}) String() string { return fmt.Sprint(\"{{ Name }}\") }",
    );
    write(
        dir.path(),
        "Err.tmpl",
        "{{ AddImport(path=\"errors\") }}\nvar err{{ Name }} = errors.New(\"{{ Name | snake_case }}\")",
    );

    let outcome = orchestrator().generate_package(dir.path()).await.unwrap();
    assert!(matches!(
        outcome,
        PackageOutcome::Written {
            fragments: 3,
            imports: 2,
            ..
        }
    ));

    let content = generated(dir.path());
    assert!(content.contains("import (\n\t\"errors\"\n\t\"fmt\"\n)\n"));
    assert!(content.contains("var errA = errors.New(\"a\")"));

    // Fragments follow file order, then binding order
    let a_string = content.find("func (x A) String()").unwrap();
    let a_err = content.find("var errA").unwrap();
    let b_string = content.find("func (x B) String()").unwrap();
    assert!(a_string < a_err && a_err < b_string);
}

#[tokio::test]
async fn test_template_parsed_once_per_directory() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "types.go",
        "package demo\n\ntype A struct{ Foo }\ntype B struct{ Foo }\ntype C interface{ Foo }\n",
    );
    write(dir.path(), "Foo.tmpl", "// {{ Name }}");

    let package = PackageScanner::new("mixgen_gen.go")
        .scan(dir.path())
        .await
        .unwrap();
    let mut catalog = TemplateCatalog::default();
    let bindings = resolve_bindings(&package.declarations, &mut catalog)
        .await
        .unwrap();

    assert_eq!(bindings.len(), 3);
    assert_eq!(catalog.parse_count(), 1);
}

#[tokio::test]
async fn test_repeated_runs_are_byte_identical() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "z.go", "package demo\n\ntype Z struct {\n\tFoo\n}\n");
    write(dir.path(), "a.go", "package demo\n\ntype A struct {\n\tFoo\n}\n");
    write(
        dir.path(),
        "Foo.tmpl",
        "{{ AddImport(path=\"strings\") }}{{ AddImport(path=\"bytes\") }}\nvar _ = strings.ToUpper(\"{{ Name }}\")\nvar _ = bytes.MinRead\n",
    );

    let orchestrator = orchestrator();
    orchestrator.generate_package(dir.path()).await.unwrap();
    let first = generated(dir.path());
    orchestrator.generate_package(dir.path()).await.unwrap();
    let second = generated(dir.path());

    assert_eq!(first, second);
    assert!(first.find("\"A\"").unwrap() < first.find("\"Z\"").unwrap());
}

#[tokio::test]
async fn test_execution_error_leaves_existing_output_untouched() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "bar.go", "package demo\n\ntype Bar struct {\n\tFoo\n}\n");
    write(dir.path(), "Foo.tmpl", "// {{ Missing }}");
    let previous = format!("{HEADER}\n\npackage demo\n\n// previous run\n");
    write(dir.path(), "mixgen_gen.go", &previous);

    let result = orchestrator().generate_package(dir.path()).await;
    match result {
        Err(GenerationError::TemplateExecution {
            declaration,
            template,
            ..
        }) => {
            assert_eq!(declaration, "Bar");
            assert_eq!(template, "Foo");
        }
        other => panic!("Expected TemplateExecution, got {:?}", other),
    }
    assert_eq!(generated(dir.path()), previous);
}

#[tokio::test]
async fn test_invalid_generated_code_is_rejected() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "bar.go", "package demo\n\ntype Bar struct {\n\tFoo\n}\n");
    write(dir.path(), "Foo.tmpl", "func {{ Name }}( {");

    let result = orchestrator().generate_package(dir.path()).await;
    match result {
        Err(GenerationError::OutputFormat { source_text, .. }) => {
            assert!(source_text.contains("func Bar( {"));
        }
        other => panic!("Expected OutputFormat, got {:?}", other),
    }
    assert!(!dir.path().join("mixgen_gen.go").exists());
}

#[tokio::test]
async fn test_no_bindings_writes_nothing_and_removes_stale_output() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "bar.go", "package demo\n\ntype Bar struct {\n\tName string\n}\n");

    let outcome = orchestrator().generate_package(dir.path()).await.unwrap();
    assert_eq!(outcome, PackageOutcome::NoBindings { removed_stale: false });
    assert!(!dir.path().join("mixgen_gen.go").exists());

    write(
        dir.path(),
        "mixgen_gen.go",
        &format!("{HEADER}\n\npackage demo\n\n// stale\n"),
    );
    let outcome = orchestrator().generate_package(dir.path()).await.unwrap();
    assert_eq!(outcome, PackageOutcome::NoBindings { removed_stale: true });
    assert!(!dir.path().join("mixgen_gen.go").exists());
}

#[tokio::test]
async fn test_generated_output_is_not_rescanned() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "bar.go", "package demo\n\ntype Bar struct {\n\tFoo\n}\n");
    // The template emits a type that embeds Foo; it must not bind on the next run
    write(dir.path(), "Foo.tmpl", "type {{ Name }}Mirror struct {\n\tFoo\n}\n");

    let orchestrator = orchestrator();
    orchestrator.generate_package(dir.path()).await.unwrap();
    let outcome = orchestrator.generate_package(dir.path()).await.unwrap();

    assert!(matches!(outcome, PackageOutcome::Written { fragments: 1, .. }));
    assert_eq!(generated(dir.path()).matches("BarMirror").count(), 1);
}

#[tokio::test]
async fn test_directories_are_isolated() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    write(first.path(), "a.go", "package one\n\ntype A struct {\n\tFoo\n}\n");
    write(first.path(), "Foo.tmpl", "// one: {{ Name }}");
    write(second.path(), "b.go", "package two\n\ntype B struct {\n\tFoo\n}\n");
    write(second.path(), "Foo.tmpl", "// two: {{ Name }}");

    let orchestrator = Arc::new(orchestrator());
    let (a, b) = tokio::join!(
        orchestrator.generate_package(first.path()),
        orchestrator.generate_package(second.path())
    );
    a.unwrap();
    b.unwrap();

    let one = generated(first.path());
    let two = generated(second.path());
    assert!(one.contains("package one") && one.contains("// one: A"));
    assert!(two.contains("package two") && two.contains("// two: B"));
    assert!(!one.contains("two:"));
}

fn orchestrator_writing(output_file: &str) -> GenerationOrchestrator {
    let config = Config {
        formatter: FormatterKind::SyntaxCheck,
        output_file: output_file.to_string(),
        ..Config::default()
    };
    GenerationOrchestrator::new(
        config,
        Arc::new(SyntaxCheckFormatter::new()),
        Arc::new(FileSystemOutputService::new()),
    )
}

#[tokio::test]
async fn test_hand_written_output_file_is_not_overwritten() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "bar.go", "package demo\n\ntype Bar struct {\n\tFoo\n}\n");
    write(dir.path(), "Foo.tmpl", "// for {{ Name }}");
    let user = "package demo\n\nfunc Keep() {}\n";
    write(dir.path(), "user.go", user);

    let result = orchestrator_writing("user.go")
        .generate_package(dir.path())
        .await;
    match result {
        Err(GenerationError::ForeignOutput { path }) => {
            assert_eq!(path, dir.path().join("user.go"));
        }
        other => panic!("Expected ForeignOutput, got {:?}", other),
    }
    assert_eq!(std::fs::read_to_string(dir.path().join("user.go")).unwrap(), user);
}

#[tokio::test]
async fn test_hand_written_output_file_is_not_removed() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "bar.go", "package demo\n\ntype Bar struct {\n\tName string\n}\n");
    // Another generator's marker is not enough
    let user = "// Code generated by stringer. DO NOT EDIT.\n\npackage demo\n";
    write(dir.path(), "user.go", user);

    let result = orchestrator_writing("user.go")
        .generate_package(dir.path())
        .await;
    assert!(matches!(result, Err(GenerationError::ForeignOutput { .. })));
    assert_eq!(std::fs::read_to_string(dir.path().join("user.go")).unwrap(), user);
}

#[tokio::test]
async fn test_own_output_file_is_replaced() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "bar.go", "package demo\n\ntype Bar struct {\n\tFoo\n}\n");
    write(dir.path(), "Foo.tmpl", "// for {{ Name }}");
    write(
        dir.path(),
        "zz_mixins.go",
        &format!("{HEADER}\n\npackage demo\n\n// previous run\n"),
    );

    let outcome = orchestrator_writing("zz_mixins.go")
        .generate_package(dir.path())
        .await
        .unwrap();
    assert!(matches!(outcome, PackageOutcome::Written { fragments: 1, .. }));
    let content = std::fs::read_to_string(dir.path().join("zz_mixins.go")).unwrap();
    assert!(content.contains("// for Bar"));
    assert!(!content.contains("previous run"));
}
