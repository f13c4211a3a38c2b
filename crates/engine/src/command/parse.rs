//! Command-line tokenizer and parser
//!
//! Verbs and keywords match case-insensitively; model search terms and
//! texture keys keep their case. Token handling follows the command
//! grammar: `at` positions only count when exactly three numeric tokens
//! follow, terrain options are scanned pairwise in any order, and unknown
//! filler words around a create verb are ignored.

use shared::{GeometryKind, TerrainParams, TerrainVariant};

use crate::state::TextureCategory;

use super::{
    Command, CommandError, MoveMode, RotateArg, ScaleArg, SelectTarget, Target, TextureStep,
};

/// Fixed color-name table of the create verb
const COLOR_TABLE: [(&str, &str); 8] = [
    ("red", "#ff4444"),
    ("blue", "#4444ff"),
    ("green", "#44ff44"),
    ("yellow", "#ffff44"),
    ("purple", "#ff44ff"),
    ("orange", "#ff8844"),
    ("pink", "#ff88cc"),
    ("cyan", "#44ffff"),
];

/// Normalize a raw line that did not go through the language translator:
/// commas and parentheses become spaces, whitespace collapses.
pub fn normalize(raw: &str) -> String {
    raw.replace(['(', ')', ','], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse one normalized command line
pub fn parse(line: &str) -> Result<Command, CommandError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some(first) = parts.first() else {
        return Err(CommandError::Syntax("Empty command".to_string()));
    };

    match first.to_lowercase().as_str() {
        "create" => parse_create(&parts),
        "clone" | "duplicate" | "copy" => Ok(Command::Clone {
            position: parse_at(&parts),
        }),
        "select" => parse_select(&parts),
        "delete" | "remove" => parse_delete(&parts),
        "scale" => parse_scale(&parts),
        "rotate" => parse_rotate(&parts),
        "move" => parse_move(&parts),
        "change" => parse_change(&parts),
        "clear" => Ok(Command::Clear),
        "reset" => Ok(Command::Reset),
        verb => Err(CommandError::UnknownCommand(verb.to_string())),
    }
}

fn parse_create(parts: &[&str]) -> Result<Command, CommandError> {
    let Some(kind_token) = parts.get(1) else {
        return Err(CommandError::Syntax(
            "Create command requires an object type".to_string(),
        ));
    };

    match kind_token.to_lowercase().as_str() {
        "model" => parse_create_model(parts),
        "terrain" => parse_create_terrain(parts),
        token => parse_create_shape(token, parts),
    }
}

fn parse_create_model(parts: &[&str]) -> Result<Command, CommandError> {
    // search terms keep their case
    let Some(term) = parts.get(2) else {
        return Err(CommandError::Syntax(
            "Create model command requires a model type".to_string(),
        ));
    };
    Ok(Command::CreateModel {
        term: term.to_string(),
        position: parse_at(parts),
    })
}

fn parse_create_terrain(parts: &[&str]) -> Result<Command, CommandError> {
    // an unmatched variant token falls back to heightmap1
    let variant = parts
        .get(2)
        .and_then(|t| TerrainVariant::parse_token(&t.to_lowercase()))
        .unwrap_or(TerrainVariant::Heightmap1);
    let mut params = TerrainParams::new(variant);

    // scan the remaining tokens pairwise, in any order; trailing
    // unmatched pairs are ignored
    let mut i = 3;
    while i < parts.len() {
        match (parts[i].to_lowercase().as_str(), parts.get(i + 1)) {
            ("grass", Some(key)) => {
                params.grass_texture = Some(key.to_string());
                i += 1;
            }
            ("mud", Some(key)) => {
                params.mud_texture = Some(key.to_string());
                i += 1;
            }
            ("rock", Some(key)) => {
                params.rock_texture = Some(key.to_string());
                i += 1;
            }
            ("heightmap", Some(value)) => {
                if let Ok(index @ 1..=5) = value.parse::<u8>() {
                    params.heightmap_index = index;
                }
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }

    Ok(Command::CreateTerrain {
        params,
        position: parse_at(parts),
    })
}

fn parse_create_shape(kind_token: &str, parts: &[&str]) -> Result<Command, CommandError> {
    // `model` and `terrain` are routed before this point, so the token is
    // either a basic shape or unknown
    let Some(kind) = GeometryKind::parse_token(kind_token) else {
        return Err(CommandError::Syntax(format!(
            "Unknown object type: {kind_token}"
        )));
    };

    let mut color = None;
    for part in &parts[2..] {
        if part.eq_ignore_ascii_case("at") {
            break;
        }
        if part.starts_with('#') {
            color = Some(part.to_string());
        } else if let Some((_, hex)) = COLOR_TABLE
            .iter()
            .find(|(name, _)| part.eq_ignore_ascii_case(name))
        {
            color = Some(hex.to_string());
        }
    }

    Ok(Command::CreateShape {
        kind,
        color,
        position: parse_at(parts),
    })
}

fn parse_select(parts: &[&str]) -> Result<Command, CommandError> {
    let Some(target) = parts.get(1) else {
        return Err(CommandError::Syntax(
            "Select command requires a target".to_string(),
        ));
    };
    let target = target.to_lowercase();
    Ok(Command::Select(match target.as_str() {
        "all" => SelectTarget::All,
        "none" => SelectTarget::None,
        "cubes" => SelectTarget::Kind(GeometryKind::Box),
        "spheres" => SelectTarget::Kind(GeometryKind::Sphere),
        "cylinders" => SelectTarget::Kind(GeometryKind::Cylinder),
        _ => SelectTarget::Name(target),
    }))
}

fn parse_delete(parts: &[&str]) -> Result<Command, CommandError> {
    let Some(target) = parts.get(1) else {
        return Err(CommandError::Syntax(
            "Delete command requires a target".to_string(),
        ));
    };
    Ok(Command::Delete(parse_target(target)))
}

fn parse_scale(parts: &[&str]) -> Result<Command, CommandError> {
    if parts.len() < 3 {
        return Err(CommandError::Syntax(
            "Scale command requires target and scale values (e.g., \"scale selected 2\")"
                .to_string(),
        ));
    }
    let values = parse_numbers(&parts[2..], "scale")?;
    let arg = match values.as_slice() {
        [f] => ScaleArg::Uniform(*f),
        [x, y, z] => ScaleArg::PerAxis([*x, *y, *z]),
        _ => {
            return Err(CommandError::InvalidArgument(
                "Scale requires 1 or 3 values (uniform or x y z)".to_string(),
            ))
        }
    };
    Ok(Command::Scale {
        target: parse_target(parts[1]),
        arg,
    })
}

fn parse_rotate(parts: &[&str]) -> Result<Command, CommandError> {
    if parts.len() < 3 {
        return Err(CommandError::Syntax(
            "Rotate command requires target and rotation values (e.g., \"rotate selected 45\")"
                .to_string(),
        ));
    }
    let values = parse_numbers(&parts[2..], "rotation")?;
    let arg = match values.as_slice() {
        [deg] => RotateArg::Yaw(*deg),
        [x, y, z] => RotateArg::PerAxis([*x, *y, *z]),
        _ => {
            return Err(CommandError::InvalidArgument(
                "Rotation requires 1 or 3 values (Y-axis or X Y Z)".to_string(),
            ))
        }
    };
    Ok(Command::Rotate {
        target: parse_target(parts[1]),
        arg,
    })
}

fn parse_move(parts: &[&str]) -> Result<Command, CommandError> {
    if parts.len() < 3 {
        return Err(CommandError::Syntax(
            "Move command requires target and coordinates (e.g., \"move selected to 1 2 3\")"
                .to_string(),
        ));
    }
    let (mode, rest) = match parts[2].to_lowercase().as_str() {
        "to" => (MoveMode::Absolute, &parts[3..]),
        "by" => (MoveMode::Relative, &parts[3..]),
        _ => (MoveMode::Relative, &parts[2..]),
    };
    let values = parse_numbers(rest, "move")?;
    let [x, y, z] = values.as_slice() else {
        return Err(CommandError::InvalidArgument(
            "Move command requires 3 coordinate values (x y z)".to_string(),
        ));
    };
    Ok(Command::Move {
        target: parse_target(parts[1]),
        mode,
        values: [*x, *y, *z],
    })
}

fn parse_change(parts: &[&str]) -> Result<Command, CommandError> {
    if parts.get(1).map(|p| p.to_lowercase()).as_deref() != Some("texture") {
        return Err(CommandError::Syntax(
            "Only texture changes are supported (e.g., \"change texture grass 2\")".to_string(),
        ));
    }
    if parts.len() < 4 {
        return Err(CommandError::Syntax(
            "Texture change requires type and value (e.g., \"change texture grass 2\")"
                .to_string(),
        ));
    }

    let type_token = parts[2].to_lowercase();
    let Some(category) = TextureCategory::parse_token(&type_token) else {
        return Err(CommandError::InvalidArgument(format!(
            "Invalid texture type: {type_token}. Use grass, mud, rock, or heightmap"
        )));
    };

    let value = parts[3].to_lowercase();
    let step = match value.as_str() {
        "next" => TextureStep::Next,
        "prev" | "previous" => TextureStep::Prev,
        _ => match value.parse::<u32>() {
            Ok(index) => TextureStep::Index(index),
            Err(_) => {
                return Err(CommandError::InvalidArgument(format!(
                    "Texture value must be an index, next, or prev: {value}"
                )))
            }
        },
    };

    Ok(Command::ChangeTexture { category, step })
}

fn parse_target(token: &str) -> Target {
    if token.eq_ignore_ascii_case("selected") {
        Target::Selected
    } else {
        Target::Name(token.to_string())
    }
}

/// Parse every token as a number; a non-numeric token is a syntax error
fn parse_numbers(tokens: &[&str], what: &str) -> Result<Vec<f32>, CommandError> {
    tokens
        .iter()
        .map(|t| {
            t.parse::<f32>()
                .map_err(|_| CommandError::Syntax(format!("Invalid {what} value: {t}")))
        })
        .collect()
}

/// Position of the first `at x y z` group, if well-formed
fn parse_at(parts: &[&str]) -> Option<[f32; 3]> {
    let at = parts.iter().position(|p| p.eq_ignore_ascii_case("at"))?;
    if at + 3 >= parts.len() {
        return None;
    }
    let x = parts[at + 1].parse::<f32>().ok()?;
    let y = parts[at + 2].parse::<f32>().ok()?;
    let z = parts[at + 3].parse::<f32>().ok()?;
    Some([x, y, z])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_punctuation() {
        assert_eq!(normalize("move box1 to (1, 2, 3)"), "move box1 to 1 2 3");
        assert_eq!(normalize("  create   cube  "), "create cube");
    }

    #[test]
    fn test_create_cube_aliases_box() {
        let cmd = parse("create cube red at 2 0 0").unwrap();
        assert_eq!(
            cmd,
            Command::CreateShape {
                kind: GeometryKind::Box,
                color: Some("#ff4444".to_string()),
                position: Some([2.0, 0.0, 0.0]),
            }
        );
    }

    #[test]
    fn test_create_shape_hex_color_verbatim() {
        let cmd = parse("create sphere #abcdef").unwrap();
        assert_eq!(
            cmd,
            Command::CreateShape {
                kind: GeometryKind::Sphere,
                color: Some("#abcdef".to_string()),
                position: None,
            }
        );
    }

    #[test]
    fn test_create_shape_malformed_at_is_ignored() {
        let cmd = parse("create cylinder at 1 2").unwrap();
        assert_eq!(
            cmd,
            Command::CreateShape {
                kind: GeometryKind::Cylinder,
                color: None,
                position: None,
            }
        );
    }

    #[test]
    fn test_create_unknown_type() {
        assert!(matches!(
            parse("create banana"),
            Err(CommandError::Syntax(_))
        ));
        assert!(matches!(parse("create"), Err(CommandError::Syntax(_))));
    }

    #[test]
    fn test_create_terrain_defaults() {
        let cmd = parse("create terrain").unwrap();
        let Command::CreateTerrain { params, position } = cmd else {
            panic!("expected terrain");
        };
        assert_eq!(params.variant, TerrainVariant::Heightmap1);
        assert_eq!(params.heightmap_index, 1);
        assert_eq!(params.grass_texture, None);
        assert_eq!(position, None);
    }

    #[test]
    fn test_create_terrain_variant_and_options() {
        let cmd = parse("create terrain heightmap3 rock granite grass meadow heightmap 5 at 0 1 0")
            .unwrap();
        let Command::CreateTerrain { params, position } = cmd else {
            panic!("expected terrain");
        };
        assert_eq!(params.variant, TerrainVariant::Heightmap3);
        assert_eq!(params.heightmap_index, 5);
        assert_eq!(params.grass_texture.as_deref(), Some("meadow"));
        assert_eq!(params.rock_texture.as_deref(), Some("granite"));
        assert_eq!(params.mud_texture, None);
        assert_eq!(position, Some([0.0, 1.0, 0.0]));
    }

    #[test]
    fn test_create_terrain_bad_variant_falls_back() {
        let Command::CreateTerrain { params, .. } = parse("create terrain heightmap9").unwrap()
        else {
            panic!("expected terrain");
        };
        assert_eq!(params.variant, TerrainVariant::Heightmap1);
        assert_eq!(params.heightmap_index, 1);
    }

    #[test]
    fn test_create_model_keeps_case() {
        let cmd = parse("create model DeLorean at 1 2 3").unwrap();
        assert_eq!(
            cmd,
            Command::CreateModel {
                term: "DeLorean".to_string(),
                position: Some([1.0, 2.0, 3.0]),
            }
        );
    }

    #[test]
    fn test_clone_verbs() {
        for verb in ["clone", "duplicate", "copy"] {
            assert_eq!(parse(verb).unwrap(), Command::Clone { position: None });
        }
        assert_eq!(
            parse("clone at 10 0 0").unwrap(),
            Command::Clone {
                position: Some([10.0, 0.0, 0.0])
            }
        );
    }

    #[test]
    fn test_select_targets() {
        assert_eq!(parse("select all").unwrap(), Command::Select(SelectTarget::All));
        assert_eq!(
            parse("select none").unwrap(),
            Command::Select(SelectTarget::None)
        );
        assert_eq!(
            parse("select cubes").unwrap(),
            Command::Select(SelectTarget::Kind(GeometryKind::Box))
        );
        assert_eq!(
            parse("select BOX1").unwrap(),
            Command::Select(SelectTarget::Name("box1".to_string()))
        );
    }

    #[test]
    fn test_delete_and_remove() {
        assert_eq!(
            parse("delete selected").unwrap(),
            Command::Delete(Target::Selected)
        );
        assert_eq!(
            parse("remove box1").unwrap(),
            Command::Delete(Target::Name("box1".to_string()))
        );
    }

    #[test]
    fn test_scale_arity() {
        assert_eq!(
            parse("scale selected 2").unwrap(),
            Command::Scale {
                target: Target::Selected,
                arg: ScaleArg::Uniform(2.0)
            }
        );
        assert_eq!(
            parse("scale box1 1 2 3").unwrap(),
            Command::Scale {
                target: Target::Name("box1".to_string()),
                arg: ScaleArg::PerAxis([1.0, 2.0, 3.0])
            }
        );
        assert!(matches!(
            parse("scale box1 1 2"),
            Err(CommandError::InvalidArgument(_))
        ));
        assert!(matches!(
            parse("scale box1 big"),
            Err(CommandError::Syntax(_))
        ));
    }

    #[test]
    fn test_rotate_arity() {
        assert_eq!(
            parse("rotate selected 90").unwrap(),
            Command::Rotate {
                target: Target::Selected,
                arg: RotateArg::Yaw(90.0)
            }
        );
        assert!(matches!(
            parse("rotate box1 1 2 3 4"),
            Err(CommandError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_rotate_radians_conversion() {
        let arg = RotateArg::Yaw(180.0);
        let rad = arg.radians();
        assert!((rad[1] - std::f32::consts::PI).abs() < 1e-6);
        assert_eq!(rad[0], 0.0);
        assert_eq!(rad[2], 0.0);
    }

    #[test]
    fn test_move_modes() {
        assert_eq!(
            parse("move box1 to 5 5 5").unwrap(),
            Command::Move {
                target: Target::Name("box1".to_string()),
                mode: MoveMode::Absolute,
                values: [5.0, 5.0, 5.0],
            }
        );
        assert_eq!(
            parse("move box1 by 0 1 0").unwrap(),
            Command::Move {
                target: Target::Name("box1".to_string()),
                mode: MoveMode::Relative,
                values: [0.0, 1.0, 0.0],
            }
        );
        // omitted keyword is relative
        assert_eq!(
            parse("move box1 3 0 0").unwrap(),
            Command::Move {
                target: Target::Name("box1".to_string()),
                mode: MoveMode::Relative,
                values: [3.0, 0.0, 0.0],
            }
        );
        assert!(matches!(
            parse("move box1 to 1 2"),
            Err(CommandError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_change_texture() {
        assert_eq!(
            parse("change texture grass next").unwrap(),
            Command::ChangeTexture {
                category: TextureCategory::Grass,
                step: TextureStep::Next
            }
        );
        assert_eq!(
            parse("change texture heightmap 3").unwrap(),
            Command::ChangeTexture {
                category: TextureCategory::Heightmap,
                step: TextureStep::Index(3)
            }
        );
        assert_eq!(
            parse("change texture rock previous").unwrap(),
            Command::ChangeTexture {
                category: TextureCategory::Rock,
                step: TextureStep::Prev
            }
        );
        assert!(matches!(
            parse("change texture lava 2"),
            Err(CommandError::InvalidArgument(_))
        ));
        assert!(matches!(
            parse("change color red"),
            Err(CommandError::Syntax(_))
        ));
    }

    #[test]
    fn test_unknown_verb() {
        assert_eq!(
            parse("explode box1"),
            Err(CommandError::UnknownCommand("explode".to_string()))
        );
    }

    #[test]
    fn test_case_insensitive_verbs() {
        assert_eq!(parse("CLEAR").unwrap(), Command::Clear);
        assert_eq!(parse("Reset").unwrap(), Command::Reset);
        assert!(matches!(
            parse("CREATE Cube"),
            Ok(Command::CreateShape { .. })
        ));
    }
}
