//! Ordered point sequences used by polylines and polygon rings.
//!
//! Every mutation reports what changed through a [`PathChange`] so owners can
//! react to edits without registering per-index listeners.

use crate::LatLng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A change made to a path.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PathChange {
    /// A vertex was inserted at `index`.
    Inserted { index: usize },
    /// The vertex at `index` was removed.
    Removed { index: usize, point: LatLng },
    /// The vertex at `index` was replaced.
    Set { index: usize, previous: LatLng },
}

impl PathChange {
    pub fn index(&self) -> usize {
        match self {
            PathChange::Inserted { index }
            | PathChange::Removed { index, .. }
            | PathChange::Set { index, .. } => *index,
        }
    }
}

/// An edit request against a path, as reported by the map widget.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PathEdit {
    InsertAt { index: usize, point: LatLng },
    RemoveAt { index: usize },
    SetAt { index: usize, point: LatLng },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathError {
    OutOfRange { index: usize, len: usize },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { index, len } => {
                write!(f, "Path index {} out of range (length {})", index, len)
            }
        }
    }
}

impl std::error::Error for PathError {}

/// An ordered sequence of points.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path {
    points: Vec<LatLng>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: impl IntoIterator<Item = LatLng>) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }

    pub fn points(&self) -> &[LatLng] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<LatLng> {
        self.points.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LatLng> {
        self.points.iter()
    }

    /// Append a point at the end of the path.
    pub fn push(&mut self, point: LatLng) -> PathChange {
        self.points.push(point);
        PathChange::Inserted {
            index: self.points.len() - 1,
        }
    }

    /// Insert a point before `index`. `index == len` appends.
    pub fn insert_at(&mut self, index: usize, point: LatLng) -> Result<PathChange, PathError> {
        if index > self.points.len() {
            return Err(self.out_of_range(index));
        }
        self.points.insert(index, point);
        Ok(PathChange::Inserted { index })
    }

    pub fn remove_at(&mut self, index: usize) -> Result<PathChange, PathError> {
        if index >= self.points.len() {
            return Err(self.out_of_range(index));
        }
        let point = self.points.remove(index);
        Ok(PathChange::Removed { index, point })
    }

    pub fn set_at(&mut self, index: usize, point: LatLng) -> Result<PathChange, PathError> {
        let len = self.points.len();
        match self.points.get_mut(index) {
            Some(slot) => {
                let previous = std::mem::replace(slot, point);
                Ok(PathChange::Set { index, previous })
            }
            None => Err(PathError::OutOfRange { index, len }),
        }
    }

    /// Apply an edit request, returning the resulting change notification.
    pub fn apply(&mut self, edit: PathEdit) -> Result<PathChange, PathError> {
        match edit {
            PathEdit::InsertAt { index, point } => self.insert_at(index, point),
            PathEdit::RemoveAt { index } => self.remove_at(index),
            PathEdit::SetAt { index, point } => self.set_at(index, point),
        }
    }

    fn out_of_range(&self, index: usize) -> PathError {
        PathError::OutOfRange {
            index,
            len: self.points.len(),
        }
    }
}

impl FromIterator<LatLng> for Path {
    fn from_iter<I: IntoIterator<Item = LatLng>>(iter: I) -> Self {
        Self::from_points(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> Path {
        Path::from_points([LatLng::new(0.0, 0.0), LatLng::new(1.0, 1.0)])
    }

    #[test]
    fn test_insert_reports_index() {
        let mut path = path();
        let change = path.insert_at(1, LatLng::new(0.5, 0.5)).unwrap();
        assert_eq!(change, PathChange::Inserted { index: 1 });
        assert_eq!(path.get(1), Some(LatLng::new(0.5, 0.5)));
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_insert_at_end_appends() {
        let mut path = path();
        path.insert_at(2, LatLng::new(2.0, 2.0)).unwrap();
        assert_eq!(path.get(2), Some(LatLng::new(2.0, 2.0)));
    }

    #[test]
    fn test_set_reports_previous() {
        let mut path = path();
        let change = path.set_at(0, LatLng::new(5.0, 5.0)).unwrap();
        assert_eq!(
            change,
            PathChange::Set {
                index: 0,
                previous: LatLng::new(0.0, 0.0)
            }
        );
    }

    #[test]
    fn test_out_of_range_edits_fail() {
        let mut path = path();
        assert_eq!(
            path.remove_at(2),
            Err(PathError::OutOfRange { index: 2, len: 2 })
        );
        assert!(path.insert_at(3, LatLng::default()).is_err());
        assert!(path.set_at(7, LatLng::default()).is_err());
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_apply_remove() {
        let mut path = path();
        let change = path.apply(PathEdit::RemoveAt { index: 0 }).unwrap();
        assert_eq!(change.index(), 0);
        assert_eq!(path.points(), &[LatLng::new(1.0, 1.0)]);
    }
}
