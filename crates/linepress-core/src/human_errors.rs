// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for batch reports and front-ends.
//
// Every technical error is mapped to plain English with a clear suggestion,
// so a failure report can be shown to someone who has never heard of a
// binarization threshold.

use crate::error::LinepressError;

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
}

/// Convert a `LinepressError` into a `HumanError`.
pub fn humanize_error(err: &LinepressError) -> HumanError {
    match err {
        LinepressError::Decode(detail) => HumanError {
            message: "This picture couldn't be read.".into(),
            suggestion: format!(
                "The file may be damaged or in an unusual format. Re-export it \
                 as a PNG or JPEG and try again. ({detail})"
            ),
        },

        LinepressError::InvalidInput(detail) => HumanError {
            message: "This picture is empty or too small to use.".into(),
            suggestion: format!("Pick a different source image. ({detail})"),
        },

        LinepressError::InvalidParameter(detail) => HumanError {
            message: "One of the settings doesn't make sense.".into(),
            suggestion: format!("Check the page size, paper, and bleed values. ({detail})"),
        },

        LinepressError::Image(detail) => HumanError {
            message: "Something went wrong while processing a picture.".into(),
            suggestion: format!("Try the file again; if it keeps failing, replace it. ({detail})"),
        },

        LinepressError::EmptyInput => HumanError {
            message: "There are no pages to put in the book.".into(),
            suggestion: "Process some images first, then export again.".into(),
        },

        LinepressError::Pdf(detail) => HumanError {
            message: "The book file couldn't be written.".into(),
            suggestion: format!("Check that the output folder is writable. ({detail})"),
        },

        LinepressError::Font(detail) => HumanError {
            message: "No usable font was found for the cover text.".into(),
            suggestion: format!(
                "Install a TrueType font or point the cover at a .ttf file. ({detail})"
            ),
        },

        LinepressError::Io(detail) => HumanError {
            message: "A file couldn't be read or written.".into(),
            suggestion: format!("Check the folder exists and there is disk space. ({detail})"),
        },

        LinepressError::Serialization(detail) => HumanError {
            message: "The export record couldn't be written.".into(),
            suggestion: format!("This is a bug worth reporting. ({detail})"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_errors_name_the_file() {
        let err = LinepressError::Decode("input/cat.png: bad header".into());
        let human = humanize_error(&err);
        assert!(human.suggestion.contains("cat.png"));
    }

    #[test]
    fn empty_input_has_actionable_suggestion() {
        let human = humanize_error(&LinepressError::EmptyInput);
        assert!(human.suggestion.contains("Process some images"));
    }
}
