//! Figure transforms.
//!
//! [CSS Transforms Level 1 § 7](https://www.w3.org/TR/css-transforms-1/#transform-functions)
//! and [§ 8 The transform property](https://www.w3.org/TR/css-transforms-1/#transform-property),
//! with the pivot, shear and 3D affine forms figures use. Arities are fixed:
//! any other argument count is an [`ConversionError::ArgumentCount`].
//!
//! Shorthand forms are expanded at parse time, so `scale(2)`, `scale(2, 2)`
//! and `scale(2, 2, 0, 0)` produce equal values. Serialization writes the
//! shortest form that reads back to the same value.

use serde::Serialize;

use crate::error::ConversionError;
use crate::tokenizer::{CSSToken, Position, TokenStream};

/// A single transform function. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Transform {
    /// `translate(tx[, ty[, tz]])`
    Translate {
        /// X offset.
        tx: f64,
        /// Y offset.
        ty: f64,
        /// Z offset.
        tz: f64,
    },
    /// `scale(s)`, `scale(sx, sy[, sz])`, `scale(sx, sy, px, py)`,
    /// `scale(sx, sy, sz, px, py, pz)`
    Scale {
        /// X factor.
        sx: f64,
        /// Y factor.
        sy: f64,
        /// Z factor.
        sz: f64,
        /// Pivot x.
        px: f64,
        /// Pivot y.
        py: f64,
        /// Pivot z.
        pz: f64,
    },
    /// `rotate(a[, px, py[, pz]])`
    Rotate {
        /// Angle in degrees.
        angle: f64,
        /// Pivot x.
        px: f64,
        /// Pivot y.
        py: f64,
        /// Pivot z.
        pz: f64,
    },
    /// `skew(ax[, ay])`
    Skew {
        /// X angle in degrees.
        ax: f64,
        /// Y angle in degrees.
        ay: f64,
    },
    /// `shear(x, y[, px, py])`
    Shear {
        /// X shear factor.
        x: f64,
        /// Y shear factor.
        y: f64,
        /// Pivot x.
        px: f64,
        /// Pivot y.
        py: f64,
    },
    /// `affine(...)` and `matrix(...)`, stored row-major as
    /// `mxx mxy mxz tx myx myy myz ty mzx mzy mzz tz`.
    Affine([f64; 12]),
}

/// Rows of the identity's 3D part, for detecting 2D affines.
const AFFINE_3D_IDENTITY: [(usize, f64); 6] =
    [(2, 0.0), (6, 0.0), (8, 0.0), (9, 0.0), (10, 1.0), (11, 0.0)];

impl Transform {
    /// A 2D translation.
    #[must_use]
    pub const fn translate(tx: f64, ty: f64) -> Self {
        Self::Translate { tx, ty, tz: 0.0 }
    }

    /// A 2D scale about the origin.
    #[must_use]
    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self::Scale {
            sx,
            sy,
            sz: 1.0,
            px: 0.0,
            py: 0.0,
            pz: 0.0,
        }
    }

    /// A rotation about the origin, in degrees.
    #[must_use]
    pub const fn rotate(angle: f64) -> Self {
        Self::Rotate {
            angle,
            px: 0.0,
            py: 0.0,
            pz: 0.0,
        }
    }

    /// A 2D affine `[mxx, mxy, tx, myx, myy, ty]`.
    #[must_use]
    pub const fn affine_2d(m: [f64; 6]) -> Self {
        Self::Affine([m[0], m[1], 0.0, m[2], m[3], m[4], 0.0, m[5], 0.0, 0.0, 1.0, 0.0])
    }

    /// Function name used when serializing.
    #[must_use]
    pub const fn function_name(&self) -> &'static str {
        match self {
            Self::Translate { .. } => "translate",
            Self::Scale { .. } => "scale",
            Self::Rotate { .. } => "rotate",
            Self::Skew { .. } => "skew",
            Self::Shear { .. } => "shear",
            Self::Affine(_) => "affine",
        }
    }

    /// The shortest argument list that reads back to this value.
    #[must_use]
    pub fn arguments(&self) -> Vec<f64> {
        match *self {
            Self::Translate { tx, ty, tz } => {
                if tz != 0.0 {
                    vec![tx, ty, tz]
                } else if ty != 0.0 {
                    vec![tx, ty]
                } else {
                    vec![tx]
                }
            }
            Self::Scale {
                sx,
                sy,
                sz,
                px,
                py,
                pz,
            } => {
                let pivot_2d = px != 0.0 || py != 0.0;
                if sz != 1.0 || pz != 0.0 {
                    if pivot_2d || pz != 0.0 {
                        vec![sx, sy, sz, px, py, pz]
                    } else {
                        vec![sx, sy, sz]
                    }
                } else if pivot_2d {
                    vec![sx, sy, px, py]
                } else if sx == sy {
                    vec![sx]
                } else {
                    vec![sx, sy]
                }
            }
            Self::Rotate { angle, px, py, pz } => {
                if pz != 0.0 {
                    vec![angle, px, py, pz]
                } else if px != 0.0 || py != 0.0 {
                    vec![angle, px, py]
                } else {
                    vec![angle]
                }
            }
            Self::Skew { ax, ay } => {
                if ay == 0.0 {
                    vec![ax]
                } else {
                    vec![ax, ay]
                }
            }
            Self::Shear { x, y, px, py } => {
                if px != 0.0 || py != 0.0 {
                    vec![x, y, px, py]
                } else {
                    vec![x, y]
                }
            }
            Self::Affine(m) => {
                if AFFINE_3D_IDENTITY.iter().all(|&(i, v)| m[i] == v) {
                    vec![m[0], m[1], m[3], m[4], m[5], m[7]]
                } else {
                    m.to_vec()
                }
            }
        }
    }

    /// Append this transform's tokens to `out`.
    pub fn write_tokens(&self, out: &mut Vec<CSSToken>) {
        out.push(CSSToken::function(self.function_name()));
        for (i, arg) in self.arguments().into_iter().enumerate() {
            if i > 0 {
                out.push(CSSToken::Comma);
                out.push(CSSToken::Whitespace);
            }
            out.push(CSSToken::number(arg));
        }
        out.push(CSSToken::RightParen);
    }

    /// Parse one transform function. The stream must be just past the
    /// function token named `name`, which started at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::ArgumentCount`] for an unsupported arity and
    /// [`ConversionError::UnexpectedToken`] for an unknown function or argument.
    pub fn parse_function(
        name: &str,
        position: Position,
        stream: &mut TokenStream<'_>,
    ) -> Result<Self, ConversionError> {
        log::trace!("parse_transform_function {name}");

        let function = name.to_ascii_lowercase();
        // Leading arguments that are angles; the rest are lengths.
        let angles = match function.as_str() {
            "rotate" => 1,
            "skew" => 2,
            _ => 0,
        };
        let args = parse_arguments(&function, stream, angles)?;

        let count_error = || ConversionError::ArgumentCount {
            function: function.clone(),
            count: args.len(),
            position,
        };

        let transform = match (function.as_str(), args.as_slice()) {
            ("translate", &[tx]) => Self::translate(tx, 0.0),
            ("translate", &[tx, ty]) => Self::translate(tx, ty),
            ("translate", &[tx, ty, tz]) => Self::Translate { tx, ty, tz },
            ("translate", _) => return Err(count_error()),

            ("scale", &[s]) => Self::scale(s, s),
            ("scale", &[sx, sy]) => Self::scale(sx, sy),
            ("scale", &[sx, sy, sz]) => Self::Scale {
                sx,
                sy,
                sz,
                px: 0.0,
                py: 0.0,
                pz: 0.0,
            },
            ("scale", &[sx, sy, px, py]) => Self::Scale {
                sx,
                sy,
                sz: 1.0,
                px,
                py,
                pz: 0.0,
            },
            ("scale", &[sx, sy, sz, px, py, pz]) => Self::Scale {
                sx,
                sy,
                sz,
                px,
                py,
                pz,
            },
            ("scale", _) => return Err(count_error()),

            ("rotate", &[angle]) => Self::rotate(angle),
            ("rotate", &[angle, px, py]) => Self::Rotate {
                angle,
                px,
                py,
                pz: 0.0,
            },
            ("rotate", &[angle, px, py, pz]) => Self::Rotate { angle, px, py, pz },
            ("rotate", _) => return Err(count_error()),

            ("skew", &[ax]) => Self::Skew { ax, ay: 0.0 },
            ("skew", &[ax, ay]) => Self::Skew { ax, ay },
            ("skew", _) => return Err(count_error()),

            ("shear", &[x, y]) => Self::Shear {
                x,
                y,
                px: 0.0,
                py: 0.0,
            },
            ("shear", &[x, y, px, py]) => Self::Shear { x, y, px, py },
            ("shear", _) => return Err(count_error()),

            // [SVG 1.1 § 7.15.3](https://www.w3.org/TR/SVG11/coords.html#TransformMatrixDefined)
            // "matrix(a, b, c, d, e, f)": x' = a*x + c*y + e, y' = b*x + d*y + f
            ("matrix", &[a, b, c, d, e, f]) => Self::affine_2d([a, c, e, b, d, f]),
            ("matrix", _) => return Err(count_error()),

            ("affine", &[mxx, mxy, tx, myx, myy, ty]) => {
                Self::affine_2d([mxx, mxy, tx, myx, myy, ty])
            }
            ("affine", values) if values.len() == 12 => {
                let mut m = [0.0; 12];
                m.copy_from_slice(values);
                Self::Affine(m)
            }
            ("affine", _) => return Err(count_error()),

            _ => {
                return Err(ConversionError::UnexpectedToken {
                    expected: "transform function".to_owned(),
                    found: format!("{name}("),
                    position,
                });
            }
        };
        Ok(transform)
    }

    /// Parse `none` or a whitespace-separated list of transform functions.
    ///
    /// # Errors
    ///
    /// Returns the first function's [`ConversionError`].
    pub fn parse_list(stream: &mut TokenStream<'_>) -> Result<Vec<Self>, ConversionError> {
        log::trace!("parse_transform_list");

        stream.skip_whitespace();
        if stream.peek().is_ident("none") {
            let _ = stream.next();
            return Ok(Vec::new());
        }

        let mut transforms = Vec::new();
        loop {
            match stream.next_non_whitespace() {
                CSSToken::Function(name) => {
                    let position = stream.position();
                    transforms.push(Self::parse_function(name, position, stream)?);
                }
                CSSToken::EOF if !transforms.is_empty() => return Ok(transforms),
                other => {
                    return Err(ConversionError::UnexpectedToken {
                        expected: "transform function".to_owned(),
                        found: other.to_css(),
                        position: stream.position(),
                    });
                }
            }
        }
    }
}

/// Read comma- or whitespace-separated numeric arguments up to `)`. The
/// first `angles` arguments take angle units, the others `px`.
fn parse_arguments(
    function: &str,
    stream: &mut TokenStream<'_>,
    angles: usize,
) -> Result<Vec<f64>, ConversionError> {
    let mut args = Vec::new();
    // A comma must sit between two arguments.
    let mut after_comma = false;
    loop {
        let token = stream.next_non_whitespace();
        let value = match token {
            CSSToken::RightParen if !after_comma => return Ok(args),
            CSSToken::Comma if !after_comma && !args.is_empty() => {
                after_comma = true;
                continue;
            }
            CSSToken::Number { value, .. } => *value,
            CSSToken::Dimension { value, unit, .. } => {
                let factor = if args.len() < angles {
                    angle_factor(unit)
                } else {
                    unit.eq_ignore_ascii_case("px").then_some(1.0)
                };
                match factor {
                    Some(factor) => value * factor,
                    None => {
                        return Err(ConversionError::InvalidValue {
                            message: format!("unit `{unit}` is not allowed in {function}()"),
                            position: stream.position(),
                        });
                    }
                }
            }
            other => {
                return Err(ConversionError::UnexpectedToken {
                    expected: format!("number in {function}()"),
                    found: other.to_css(),
                    position: stream.position(),
                });
            }
        };
        after_comma = false;
        args.push(value);
    }
}

/// [CSS Values § 7.1 Angle units](https://www.w3.org/TR/css-values-4/#angles)
///
/// Degrees per unit.
fn angle_factor(unit: &str) -> Option<f64> {
    match unit.to_ascii_lowercase().as_str() {
        "deg" => Some(1.0),
        "grad" => Some(0.9),
        "rad" => Some(180.0 / core::f64::consts::PI),
        "turn" => Some(360.0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::TokenList;

    fn parse(text: &str) -> Result<Vec<Transform>, ConversionError> {
        let list = TokenList::parse(text);
        Transform::parse_list(&mut list.stream())
    }

    #[test]
    fn test_angle_units() {
        assert_eq!(parse("rotate(0.5turn)").ok(), Some(vec![Transform::rotate(180.0)]));
        assert_eq!(parse("skew(100grad)").ok(), Some(vec![Transform::Skew { ax: 90.0, ay: 0.0 }]));
    }

    #[test]
    fn test_rotate_pivot_is_a_length() {
        assert_eq!(
            parse("rotate(90deg, 10px, 20px)").ok(),
            Some(vec![Transform::Rotate {
                angle: 90.0,
                px: 10.0,
                py: 20.0,
                pz: 0.0
            }])
        );
        assert!(parse("rotate(90deg, 1turn, 0)").is_err());
    }

    #[test]
    fn test_length_units_are_rejected() {
        assert!(matches!(
            parse("translate(1em)"),
            Err(ConversionError::InvalidValue { .. })
        ));
        assert_eq!(parse("translate(3px, 4)").ok(), Some(vec![Transform::translate(3.0, 4.0)]));
    }

    #[test]
    fn test_shortest_arguments() {
        assert_eq!(Transform::scale(2.0, 2.0).arguments(), vec![2.0]);
        assert_eq!(Transform::translate(1.0, 0.0).arguments(), vec![1.0]);
        assert_eq!(
            Transform::affine_2d([1.0, 0.0, 5.0, 0.0, 1.0, 6.0]).arguments(),
            vec![1.0, 0.0, 5.0, 0.0, 1.0, 6.0]
        );
    }
}
