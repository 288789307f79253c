//! Command and query execution against a drawing manager.
//!
//! This module connects the abstract Command/Query types to the
//! [`DrawManager`], executing operations and returning results.

use crate::{
    mode_name, Command, CommandResult, DrawManager, MapSurface, Query, QueryResult, ShapeInfo,
};
use shape::{ShapeId, ShapeRecord};

/// Execute a command against a drawing manager.
pub fn execute_command<M: MapSurface>(
    manager: &mut DrawManager<M>,
    command: Command,
) -> CommandResult {
    match command {
        Command::Clear => {
            let ids = shape_ids(manager);
            manager.clear();
            CommandResult::deleted(ids)
        }

        Command::Delete => match manager.selection() {
            Some(id) => {
                manager.delete();
                CommandResult::deleted(vec![id])
            }
            None => {
                manager.delete();
                CommandResult::success()
            }
        },

        Command::Enable => {
            manager.enable();
            CommandResult::success()
        }

        Command::Disable => {
            manager.disable();
            CommandResult::success()
        }

        Command::Save => match manager.json() {
            Ok(_) => {
                manager.save();
                CommandResult::success()
            }
            Err(e) => CommandResult::error(e.to_string()),
        },

        Command::Load => {
            let before = shape_ids(manager);
            manager.load();
            CommandResult::Success {
                created: shape_ids(manager),
                modified: vec![],
                deleted: before,
            }
        }

        Command::SetMode { mode } => {
            if manager.set_mode(mode) {
                CommandResult::success()
            } else {
                CommandResult::error(format!("Drawing mode {} is not available", mode_name(mode)))
            }
        }

        Command::Draw { geometry, color } => {
            let id = manager.shape_drawn(ShapeRecord::new(geometry, color));
            CommandResult::created(vec![id])
        }

        Command::Edit { id, geometry } => {
            let Some(shape) = manager.store().get(id) else {
                return not_found(id);
            };
            if shape.kind() != geometry.kind() {
                return CommandResult::error(format!(
                    "Cannot turn {} {} into a {}",
                    shape.kind(),
                    id,
                    geometry.kind()
                ));
            }
            manager.shape_edited(id, geometry);
            CommandResult::modified(vec![id])
        }

        Command::EditPath { id, ring, edit } => {
            if !manager.store().contains(id) {
                return not_found(id);
            }
            if manager.path_edited(id, ring, edit) {
                CommandResult::modified(vec![id])
            } else {
                CommandResult::error(format!(
                    "Cannot apply {:?} to path {} of shape {}",
                    edit, ring, id
                ))
            }
        }

        Command::SetColor { id, color } => {
            if manager.set_color(id, color) {
                CommandResult::modified(vec![id])
            } else {
                not_found(id)
            }
        }

        Command::ClickShape { id } => {
            if !manager.store().contains(id) {
                return not_found(id);
            }
            manager.shape_clicked(id);
            CommandResult::success()
        }

        Command::ClickMap => {
            manager.map_clicked();
            CommandResult::success()
        }

        Command::Batch { commands } => {
            let mut result = CommandResult::success();
            for cmd in commands {
                let next = execute_command(manager, cmd);
                let failed = !next.is_success();
                result = result.merge(next);
                if failed {
                    break;
                }
            }
            result
        }
    }
}

/// Execute a query against a drawing manager.
pub fn execute_query<M: MapSurface>(manager: &DrawManager<M>, query: Query) -> QueryResult {
    match query {
        Query::GetSelection => QueryResult::Selection {
            id: manager.selection(),
        },

        Query::GetAllShapes => QueryResult::Shapes {
            shapes: manager.store().iter().map(ShapeInfo::from).collect(),
        },

        Query::GetShape { id } => QueryResult::Shape {
            shape: manager.store().get(id).map(ShapeInfo::from),
        },

        Query::GetShapeCount => QueryResult::Count {
            count: manager.store().len(),
        },

        Query::GetMode => QueryResult::Mode {
            mode: manager.mode(),
        },

        Query::GetJson => match manager.json() {
            Ok(json) => QueryResult::Json { json },
            Err(e) => QueryResult::Error {
                message: e.to_string(),
            },
        },

        Query::IsEnabled => QueryResult::Enabled {
            enabled: manager.enabled(),
        },
    }
}

fn shape_ids<M: MapSurface>(manager: &DrawManager<M>) -> Vec<ShapeId> {
    manager.store().iter().map(|s| s.id()).collect()
}

fn not_found(id: ShapeId) -> CommandResult {
    CommandResult::error(format!("Shape {} not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Console, DrawOptions, HeadlessMap};
    use shape::{Geometry, LatLng, Path, PathEdit, ShapeKind};
    use storage::{LoadHandler, SaveHandler};

    fn manager() -> DrawManager<HeadlessMap> {
        DrawManager::new(
            HeadlessMap::new(),
            DrawOptions::default(),
            SaveHandler::None,
            LoadHandler::None,
            Console::Silent,
        )
    }

    fn draw_rectangle() -> Command {
        Command::Draw {
            geometry: Geometry::rectangle(LatLng::new(0.0, 0.0), LatLng::new(1.0, 1.0)),
            color: "#FF0000".to_string(),
        }
    }

    fn draw_polygon() -> Command {
        let ring = Path::from_points([
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 1.0),
            LatLng::new(1.0, 1.0),
        ]);
        Command::Draw {
            geometry: Geometry::polygon([ring]),
            color: "#00FF00".to_string(),
        }
    }

    #[test]
    fn test_draw_and_delete() {
        let mut m = manager();
        let result = execute_command(&mut m, draw_rectangle());
        assert_eq!(result, CommandResult::created(vec![ShapeId::new(0)]));
        assert_eq!(m.selection(), Some(ShapeId::new(0)));

        let result = execute_command(&mut m, Command::Delete);
        assert_eq!(result, CommandResult::deleted(vec![ShapeId::new(0)]));
        assert!(m.store().is_empty());

        // Nothing selected.
        assert_eq!(execute_command(&mut m, Command::Delete), CommandResult::success());
    }

    #[test]
    fn test_clear_reports_deleted() {
        let mut m = manager();
        execute_command(&mut m, draw_rectangle());
        execute_command(&mut m, draw_polygon());

        let result = execute_command(&mut m, Command::Clear);
        assert_eq!(
            result,
            CommandResult::deleted(vec![ShapeId::new(0), ShapeId::new(1)])
        );
        assert_eq!(
            execute_query(&m, Query::GetJson),
            QueryResult::Json {
                json: r#"{"shapes":[]}"#.to_string()
            }
        );
    }

    #[test]
    fn test_edit_refuses_kind_change() {
        let mut m = manager();
        execute_command(&mut m, draw_rectangle());

        let result = execute_command(
            &mut m,
            Command::Edit {
                id: ShapeId::new(0),
                geometry: Geometry::circle(LatLng::new(0.0, 0.0), 1.0),
            },
        );
        assert!(!result.is_success());

        let result = execute_command(
            &mut m,
            Command::Edit {
                id: ShapeId::new(0),
                geometry: Geometry::rectangle(LatLng::new(0.0, 0.0), LatLng::new(2.0, 2.0)),
            },
        );
        assert_eq!(result, CommandResult::modified(vec![ShapeId::new(0)]));
    }

    #[test]
    fn test_edit_path() {
        let mut m = manager();
        execute_command(&mut m, draw_polygon());

        let result = execute_command(
            &mut m,
            Command::EditPath {
                id: ShapeId::new(0),
                ring: 0,
                edit: PathEdit::SetAt {
                    index: 2,
                    point: LatLng::new(5.0, 5.0),
                },
            },
        );
        assert!(result.is_success());

        let result = execute_command(
            &mut m,
            Command::EditPath {
                id: ShapeId::new(0),
                ring: 1,
                edit: PathEdit::RemoveAt { index: 0 },
            },
        );
        assert!(!result.is_success());
    }

    #[test]
    fn test_unknown_ids_fail() {
        let mut m = manager();
        let id = ShapeId::new(42);
        assert!(!execute_command(&mut m, Command::ClickShape { id }).is_success());
        assert!(!execute_command(
            &mut m,
            Command::SetColor {
                id,
                color: "#000000".to_string()
            }
        )
        .is_success());
    }

    #[test]
    fn test_set_mode() {
        let mut m = manager();
        let result = execute_command(
            &mut m,
            Command::SetMode {
                mode: Some(ShapeKind::Polyline),
            },
        );
        assert!(result.is_success());
        assert_eq!(
            execute_query(&m, Query::GetMode),
            QueryResult::Mode {
                mode: Some(ShapeKind::Polyline)
            }
        );

        let result = execute_command(
            &mut m,
            Command::SetMode {
                mode: Some(ShapeKind::Marker),
            },
        );
        assert_eq!(
            result,
            CommandResult::error("Drawing mode marker is not available")
        );
    }

    #[test]
    fn test_batch_stops_at_first_error() {
        let mut m = manager();
        let result = execute_command(
            &mut m,
            Command::Batch {
                commands: vec![
                    draw_rectangle(),
                    Command::ClickShape { id: ShapeId::new(9) },
                    draw_polygon(),
                ],
            },
        );
        assert!(!result.is_success());
        assert_eq!(m.store().len(), 1);
    }

    #[test]
    fn test_queries() {
        let mut m = manager();
        execute_command(&mut m, draw_rectangle());
        execute_command(&mut m, Command::ClickMap);

        assert_eq!(execute_query(&m, Query::GetSelection), QueryResult::Selection { id: None });
        assert_eq!(execute_query(&m, Query::GetShapeCount), QueryResult::Count { count: 1 });
        assert_eq!(execute_query(&m, Query::IsEnabled), QueryResult::Enabled { enabled: true });

        match execute_query(&m, Query::GetShape { id: ShapeId::new(0) }) {
            QueryResult::Shape { shape: Some(info) } => {
                assert_eq!(info.kind, ShapeKind::Rectangle);
                assert_eq!(info.color, "#FF0000");
                assert!(!info.selected);
            }
            other => panic!("unexpected result {:?}", other),
        }

        execute_command(&mut m, Command::Disable);
        assert_eq!(execute_query(&m, Query::IsEnabled), QueryResult::Enabled { enabled: false });
    }
}
