use serde::de::{self, Deserialize, Deserializer};
use serde::Serialize;

/// The static, per-ruleset record that parameterizes every other component of the engine: board
/// size, capture rules, promotion geometry, and draw-rule thresholds. The generator and evaluator
/// consult this record; no code path in this crate branches on a variant's name.
///
/// `Variant` is plain data, not a trait object — per the design notes, the hot generator takes a
/// `&Variant` once at [`Board`](crate::Board) construction and closes over it rather than
/// re-dispatching per square.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Variant {
    /// Human-readable name, used only for `Display`/logging — never matched on for behavior.
    pub name: &'static str,
    /// Board side length N. Always even; playable-square count is `N * N / 2`.
    pub board_side: u8,
    /// Whether kings slide any number of empty squares ("flying") or step exactly one square.
    pub flying_kings: bool,
    /// Whether a man may capture backward (away from its promotion row).
    pub men_capture_backward: bool,
    /// Whether only the capture sequence(s) of maximum cardinality are legal when a capture
    /// exists.
    pub must_capture_maximum: bool,
    /// Whether orthogonal (rank/file) captures are permitted in addition to diagonal ones.
    pub orthogonal_captures: bool,
    /// Whether a capture chain continues as a king after a mid-chain promotion (Standard/Frisian)
    /// or stops immediately on the promotion square (American/Russian). See `DESIGN.md` for the
    /// open-question resolution.
    pub flying_on_promotion: bool,
    /// Relative weight of a king capture versus a man capture (1.0) when breaking ties between
    /// equal-cardinality chains under the maximum-capture rule. Only consulted when
    /// `orthogonal_captures` is set, matching the Frisian rulebook this tie-break originates from.
    pub capture_weight_king: f32,
    /// Halfmove-clock threshold (the *k-moves rule*) after which a game still in progress is
    /// declared a draw. `None` disables the rule.
    pub draw_rule_halfmoves: Option<u16>,
}

// `name` is `&'static str` so the four presets stay `const fn`; serde has no blanket
// `Deserialize` for `&'static str` (only `&'de str`, borrowed from the input), so a derived impl
// would not compile. Deserializing into an owned shadow struct and re-interning `name` against
// the known preset names keeps the field `'static` on the other side.
#[derive(Deserialize)]
struct VariantFields {
    name: String,
    board_side: u8,
    flying_kings: bool,
    men_capture_backward: bool,
    must_capture_maximum: bool,
    orthogonal_captures: bool,
    flying_on_promotion: bool,
    capture_weight_king: f32,
    draw_rule_halfmoves: Option<u16>,
}

impl<'de> Deserialize<'de> for Variant {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fields = VariantFields::deserialize(deserializer)?;
        let name = match fields.name.as_str() {
            "international" => "international",
            "american" => "american",
            "frisian" => "frisian",
            "russian" => "russian",
            other => {
                return Err(de::Error::custom(format!(
                    "unrecognized draughts variant name: {other}"
                )))
            }
        };

        Ok(Variant {
            name,
            board_side: fields.board_side,
            flying_kings: fields.flying_kings,
            men_capture_backward: fields.men_capture_backward,
            must_capture_maximum: fields.must_capture_maximum,
            orthogonal_captures: fields.orthogonal_captures,
            flying_on_promotion: fields.flying_on_promotion,
            capture_weight_king: fields.capture_weight_king,
            draw_rule_halfmoves: fields.draw_rule_halfmoves,
        })
    }
}

impl Variant {
    /// The number of playable (dark) squares on this variant's board: `S = N^2 / 2`.
    pub const fn squares(&self) -> usize {
        (self.board_side as usize * self.board_side as usize) / 2
    }

    /// International/Standard draughts: 10x10, flying kings, forward-only man captures,
    /// maximum-capture enforced.
    pub const fn international() -> Self {
        Self {
            name: "international",
            board_side: 10,
            flying_kings: true,
            men_capture_backward: true,
            must_capture_maximum: true,
            orthogonal_captures: false,
            flying_on_promotion: true,
            capture_weight_king: 1.0,
            draw_rule_halfmoves: Some(50 * 2),
        }
    }

    /// American/English draughts (checkers): 8x8, short-range kings, maximum-capture enforced,
    /// a capture chain stops the instant a man reaches the promotion row.
    pub const fn american() -> Self {
        Self {
            name: "american",
            board_side: 8,
            flying_kings: false,
            men_capture_backward: false,
            must_capture_maximum: true,
            orthogonal_captures: false,
            flying_on_promotion: false,
            capture_weight_king: 1.0,
            draw_rule_halfmoves: Some(40 * 2),
        }
    }

    /// Frisian draughts: 10x10, flying kings, orthogonal captures permitted alongside diagonal
    /// ones, with a configurable king/man capture-weight tie-break (defaults to 1.5, per the
    /// reference engine's tables).
    pub const fn frisian() -> Self {
        Self {
            name: "frisian",
            board_side: 10,
            flying_kings: true,
            men_capture_backward: true,
            must_capture_maximum: true,
            orthogonal_captures: true,
            flying_on_promotion: true,
            capture_weight_king: 1.5,
            draw_rule_halfmoves: Some(50 * 2),
        }
    }

    /// Russian draughts: 8x8, flying kings, captures mandatory but the longest is not required.
    pub const fn russian() -> Self {
        Self {
            name: "russian",
            board_side: 8,
            flying_kings: true,
            men_capture_backward: true,
            must_capture_maximum: false,
            orthogonal_captures: false,
            flying_on_promotion: true,
            capture_weight_king: 1.0,
            draw_rule_halfmoves: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Variant;

    #[test]
    fn round_trips_a_preset_through_json() {
        let frisian = Variant::frisian();
        let json = serde_json::to_string(&frisian).expect("serializes");
        let back: Variant = serde_json::from_str(&json).expect("deserializes");

        assert_eq!(frisian, back);
    }

    #[test]
    fn deserializing_respects_a_caller_overridden_field() {
        let mut json: serde_json::Value =
            serde_json::to_value(Variant::american()).expect("serializes to a value");
        json["capture_weight_king"] = serde_json::json!(2.0);

        let back: Variant = serde_json::from_value(json).expect("deserializes");

        assert_eq!(back.name, "american");
        assert_eq!(back.capture_weight_king, 2.0);
    }

    #[test]
    fn rejects_an_unrecognized_variant_name() {
        let mut json: serde_json::Value =
            serde_json::to_value(Variant::russian()).expect("serializes to a value");
        json["name"] = serde_json::json!("checkers-but-weirder");

        let result: Result<Variant, _> = serde_json::from_value(json);

        assert!(result.is_err());
    }
}
