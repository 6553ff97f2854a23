//! Pan/zoom state and its `scale(<float>) translate(<int>px, <int>px)` string form.
//!
//! The string is the interop format written to rendering surfaces; the engine itself carries
//! [`TransformState`]. Parsing is strict: anything outside the grammar is an error, never a
//! silently defaulted value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Translate {
    pub x: i64,
    pub y: i64,
}

impl Translate {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformState {
    pub scale: f64,
    /// `None` until a translate has been applied; distinct from an explicit `(0, 0)`.
    pub translate: Option<Translate>,
}

impl Default for TransformState {
    fn default() -> Self {
        Self::identity()
    }
}

impl TransformState {
    pub const fn identity() -> Self {
        Self {
            scale: 1.0,
            translate: None,
        }
    }

    pub const fn new(scale: f64, x: i64, y: i64) -> Self {
        Self {
            scale,
            translate: Some(Translate::new(x, y)),
        }
    }

    pub fn with_scale(self, scale: f64) -> Self {
        Self { scale, ..self }
    }

    pub fn with_translate(self, translate: Translate) -> Self {
        Self {
            translate: Some(translate),
            ..self
        }
    }

    /// Translate offset, treating "never set" as the origin.
    pub fn translate_or_origin(&self) -> Translate {
        self.translate.unwrap_or(Translate::new(0, 0))
    }
}

impl fmt::Display for TransformState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // JS `Number#toString()` formatting keeps the string byte-identical to what browser
        // hosts produce for the same scale.
        let mut buf = ryu_js::Buffer::new();
        let scale = if self.scale.is_finite() {
            buf.format_finite(self.scale)
        } else {
            "1"
        };
        write!(f, "scale({scale})")?;
        if let Some(t) = self.translate {
            write!(f, " translate({}px, {}px)", t.x, t.y)?;
        }
        Ok(())
    }
}

impl FromStr for TransformState {
    type Err = TransformParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Parser::new(s).parse()
    }
}

/// CSS-like style descriptor handed to hosts for their initial render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformStyle {
    pub transform: String,
    pub transform_origin: String,
}

impl TransformStyle {
    pub fn centered(state: &TransformState) -> Self {
        Self {
            transform: state.to_string(),
            transform_origin: "center".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid transform string at byte {offset}: {message}")]
pub struct TransformParseError {
    pub offset: usize,
    pub message: String,
}

struct Parser<'input> {
    input: &'input str,
    pos: usize,
}

impl<'input> Parser<'input> {
    fn new(input: &'input str) -> Self {
        Self { input, pos: 0 }
    }

    fn parse(mut self) -> Result<TransformState, TransformParseError> {
        let mut state = TransformState::identity();

        self.skip_ws();
        if self.eat("scale(") {
            self.skip_ws();
            state.scale = self.float()?;
            self.skip_ws();
            self.expect(")")?;
            self.skip_ws();
        }
        if self.eat("translate(") {
            self.skip_ws();
            let x = self.int()?;
            self.expect("px")?;
            self.skip_ws();
            self.expect(",")?;
            self.skip_ws();
            let y = self.int()?;
            self.expect("px")?;
            self.skip_ws();
            self.expect(")")?;
            self.skip_ws();
            state.translate = Some(Translate::new(x, y));
        }

        if self.pos < self.input.len() {
            return Err(self.error("unexpected trailing input"));
        }
        Ok(state)
    }

    fn rest(&self) -> &'input str {
        &self.input[self.pos..]
    }

    fn skip_ws(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) -> Result<(), TransformParseError> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error(format!("expected `{token}`")))
        }
    }

    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'input str {
        let start = self.pos;
        let bytes = self.input.as_bytes();
        while self.pos < bytes.len() && pred(bytes[self.pos]) {
            self.pos += 1;
        }
        &self.input[start..self.pos]
    }

    fn sign(&mut self) -> &'input str {
        let start = self.pos;
        if self.rest().starts_with(['-', '+']) {
            self.pos += 1;
        }
        &self.input[start..self.pos]
    }

    fn float(&mut self) -> Result<f64, TransformParseError> {
        let start = self.pos;
        self.sign();
        let int_digits = self.take_while(|b| b.is_ascii_digit()).len();
        let mut frac_digits = 0;
        if self.eat(".") {
            frac_digits = self.take_while(|b| b.is_ascii_digit()).len();
        }
        if int_digits + frac_digits == 0 {
            self.pos = start;
            return Err(self.error("expected a number"));
        }
        if self.rest().starts_with(['e', 'E']) {
            let mark = self.pos;
            self.pos += 1;
            self.sign();
            if self.take_while(|b| b.is_ascii_digit()).is_empty() {
                self.pos = mark;
                return Err(self.error("malformed exponent"));
            }
        }

        let text = &self.input[start..self.pos];
        match text.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => {
                self.pos = start;
                Err(self.error(format!("scale `{text}` is not a finite number")))
            }
        }
    }

    fn int(&mut self) -> Result<i64, TransformParseError> {
        let start = self.pos;
        self.sign();
        if self.take_while(|b| b.is_ascii_digit()).is_empty() {
            self.pos = start;
            return Err(self.error("expected an integer"));
        }
        let text = &self.input[start..self.pos];
        text.parse::<i64>().map_err(|_| {
            self.pos = start;
            self.error(format!("integer `{text}` is out of range"))
        })
    }

    fn error(&self, message: impl Into<String>) -> TransformParseError {
        TransformParseError {
            offset: self.pos,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<TransformState, TransformParseError> {
        s.parse()
    }

    #[test]
    fn formats_scale_first_with_js_number_text() {
        assert_eq!(TransformState::new(1.0, 10, -20).to_string(), "scale(1) translate(10px, -20px)");
        assert_eq!(TransformState::new(1.2, 0, 0).to_string(), "scale(1.2) translate(0px, 0px)");
        assert_eq!(TransformState::identity().to_string(), "scale(1)");
    }

    #[test]
    fn round_trips_through_the_string_grammar() {
        for (scale, x, y) in [
            (1.0, 0, 0),
            (1.728, 120, -35),
            (1.0 / 1.2, -7, 9_000),
            (1.2f64.powi(3), i64::from(i32::MIN), 1),
            (3.5e-7, 2, 3),
        ] {
            let state = TransformState::new(scale, x, y);
            assert_eq!(parse(&state.to_string()).unwrap(), state, "{state}");
        }
    }

    #[test]
    fn accepts_partial_and_spaced_forms() {
        assert_eq!(parse("").unwrap(), TransformState::identity());
        assert_eq!(parse("  scale(0.5)  ").unwrap(), TransformState::identity().with_scale(0.5));
        assert_eq!(
            parse("translate(3px,4px)").unwrap(),
            TransformState::identity().with_translate(Translate::new(3, 4))
        );
        assert_eq!(
            parse("scale( 2 ) translate( -3px , +4px )").unwrap(),
            TransformState::new(2.0, -3, 4)
        );
    }

    #[test]
    fn rejects_anything_outside_the_grammar() {
        for bad in [
            "scale()",
            "scale(abc)",
            "scale(1",
            "translate(1.5px, 2px)",
            "translate(1, 2)",
            "translate(nullpx, nullpx)",
            "translate(1px, 2px) scale(2)",
            "rotate(45deg)",
            "scale(1e)",
        ] {
            assert!(parse(bad).is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn errors_point_at_the_offending_byte() {
        let err = parse("scale(1) translate(1px; 2px)").unwrap_err();
        assert_eq!(err.offset, 22);
        assert!(err.to_string().contains("expected `,`"));
    }

    #[test]
    fn initial_style_is_centered() {
        let style = TransformStyle::centered(&TransformState::new(1.0, 400, -100));
        assert_eq!(style.transform, "scale(1) translate(400px, -100px)");
        assert_eq!(style.transform_origin, "center");
    }
}
