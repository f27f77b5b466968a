//! Integration tests for interface extraction.
//!
//! These tests run the generator against the Go fixtures in testdata.

use std::path::PathBuf;

use structgen::parser::{load_packages, WalkOptions};
use structgen::{Extracted, Generator, GenError, Mode, TypeFilter};

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

const FOO_INTERFACES: &str = "// BarInterface was extracted from Bar
type BarInterface interface {
\tAddThings(things ...string) *Bar
\tReturnString() string
\tSetStuff(i int) *Bar
}

// FooInterface was extracted from Foo
type FooInterface interface {
\tDo() String
}
";

fn generate(dir: &str, generator: &Generator, options: &WalkOptions) -> Vec<String> {
    let packages = load_packages(&testdata_path().join(dir), options).expect("should load packages");
    generator
        .generate_all(packages)
        .into_iter()
        .filter_map(|r| r.expect("generation should succeed"))
        .map(|o| o.text)
        .collect()
}

#[test]
fn test_foo_package_end_to_end() {
    let outputs = generate(
        "interfaces",
        &Generator::new(Mode::InterfaceExtraction),
        &WalkOptions::default(),
    );
    assert_eq!(outputs, vec![FOO_INTERFACES.to_string()]);
}

#[test]
fn test_output_is_identical_across_runs() {
    let generator = Generator::new(Mode::InterfaceExtraction);
    let first = generate("interfaces", &generator, &WalkOptions::default());
    for _ in 0..5 {
        assert_eq!(generate("interfaces", &generator, &WalkOptions::default()), first);
    }
    let parallel = Generator::new(Mode::InterfaceExtraction).parallel(true);
    assert_eq!(generate("interfaces", &parallel, &WalkOptions::default()), first);
}

#[test]
fn test_filter_selects_single_type() {
    let generator = Generator::new(Mode::InterfaceExtraction)
        .filter(TypeFilter::parse("Foo").unwrap());
    let outputs = generate("interfaces", &generator, &WalkOptions::default());
    assert_eq!(outputs.len(), 1);
    assert!(outputs[0].contains("type FooInterface interface"));
    assert!(!outputs[0].contains("BarInterface"));
}

#[test]
fn test_pointer_and_value_methods_merge() {
    let packages = load_packages(&testdata_path().join("interfaces"), &WalkOptions::default()).unwrap();
    let generator = Generator::new(Mode::InterfaceExtraction);
    let result = generator.extract(&packages[0]).unwrap();

    let Extracted::Interfaces(set) = &result.extracted else {
        panic!("expected interfaces");
    };
    assert_eq!(set.len(), 2);
    let bar = set.get("Bar").expect("Bar should have an interface");
    let names: Vec<_> = bar.sorted_methods().into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["AddThings", "ReturnString", "SetStuff"]);
    assert_eq!(bar.methods["SetStuff"], "(i int) *Bar");
    assert!(set.get("NewString").is_none(), "types without methods have no interface");
}

#[test]
fn test_test_files_opt_in() {
    let options = WalkOptions {
        include_test_files: true,
        ..WalkOptions::default()
    };
    let outputs = generate("interfaces", &Generator::new(Mode::InterfaceExtraction), &options);
    assert_eq!(outputs.len(), 1);
    let text = &outputs[0];
    assert!(text.contains("type barFixtureInterface interface {\n\tSetup()\n}"));
    // byte order puts exported names first
    assert!(text.find("FooInterface").unwrap() < text.find("barFixtureInterface").unwrap());
}

#[test]
fn test_custom_suffix() {
    let generator = Generator::new(Mode::InterfaceExtraction).interface_suffix("API");
    let outputs = generate("interfaces", &generator, &WalkOptions::default());
    assert!(outputs[0].contains("// FooAPI was extracted from Foo\ntype FooAPI interface {"));
}

#[test]
fn test_recursive_walk() {
    let generator = Generator::new(Mode::InterfaceExtraction);
    let flat = generate("nested", &generator, &WalkOptions::default());
    assert_eq!(flat.len(), 1);
    assert!(flat[0].contains("OuterInterface"));

    let options = WalkOptions {
        recursive: true,
        ..WalkOptions::default()
    };
    let deep = generate("nested", &generator, &options);
    assert_eq!(deep.len(), 2);
    assert!(deep[0].contains("OuterInterface"));
    assert!(deep[1].contains("type InnerInterface interface {\n\tDepth() int\n}"));
}

#[test]
fn test_syntax_error_is_parse_error() {
    let err = load_packages(&testdata_path().join("broken"), &WalkOptions::default()).unwrap_err();
    assert!(matches!(err, GenError::Parse { .. }));
    assert!(err.to_string().contains("broken.go"));
}
