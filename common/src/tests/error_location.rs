use crate::ErrorLocation;
use std::panic::Location;

/// **VALUE**: Verifies that `ErrorLocation::from()` captures the caller's file, line and column.
///
/// **WHY THIS MATTERS**: Every error variant in the workspace carries an `ErrorLocation`.
/// If capture breaks, all error messages lose the site that produced them.
///
/// **BUG THIS CATCHES**: Would catch if `Location::caller()` stops being propagated or the
/// file path is dropped.
#[test]
fn given_location_caller_when_error_location_created_then_captures_file_line_column() {
    // GIVEN/WHEN: Capturing the current location
    let location = ErrorLocation::from(Location::caller());

    // THEN: File, line and column are populated
    assert!(location.file.contains("error_location.rs"));
    assert!(location.line > 0);
    assert!(location.column > 0);
}

/// **VALUE**: Verifies the `[file:line:column]` display format.
///
/// **WHY THIS MATTERS**: Error messages surfaced to the dispatch boundary end with this
/// suffix; the format must stay stable and readable.
///
/// **BUG THIS CATCHES**: Would catch a Display change that drops brackets or a component.
#[test]
fn given_error_location_when_formatted_then_produces_bracketed_format() {
    // GIVEN: An ErrorLocation
    let location = ErrorLocation {
        file: "src/client/mod.rs",
        line: 42,
        column: 7,
    };

    // WHEN: Formatting
    let formatted = location.to_string();

    // THEN: Exact bracketed format
    assert_eq!(formatted, "[src/client/mod.rs:42:7]");
}

/// **VALUE**: Verifies `#[track_caller]` helpers report each call site separately.
///
/// **BUG THIS CATCHES**: Would catch if error constructors lose `#[track_caller]` and every
/// error points at the constructor instead of the failing call.
#[test]
fn given_multiple_call_sites_when_capturing_location_then_each_has_unique_line() {
    #[track_caller]
    fn capture_location() -> ErrorLocation {
        ErrorLocation::from(Location::caller())
    }

    let loc1 = capture_location();
    let loc2 = capture_location();

    assert_eq!(loc1.file, loc2.file);
    assert_eq!(loc1.line + 1, loc2.line, "Lines should be sequential");
}
