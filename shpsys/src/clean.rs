//! Removal of defects from shapes: references to degenerate arcs, spikes and zero-area rings.
//!
//! Duplicate points are not touched here (see [`ArcCollection::dedup_coords`]) and ring winding is not checked.

use crate::arc_id::ArcId;
use crate::arcs::ArcCollection;
use crate::error::ShpsysError;
use crate::shape::{GeometryType, Path, Shape};

/// Cleans every shape of a layer in place.
pub fn clean_shapes(
    shapes: &mut [Option<Shape>],
    arcs: &ArcCollection,
    geometry_type: GeometryType,
) -> Result<(), ShpsysError> {
    for shape in shapes.iter_mut() {
        *shape = clean_shape(shape.take(), arcs, geometry_type)?;
    }
    Ok(())
}

/// Drops degenerate arcs from every path of the shape. For polygons, also removes spikes and drops rings with zero
/// area. Returns `None` if no path is left. Point shapes are returned unchanged.
pub fn clean_shape(
    shape: Option<Shape>,
    arcs: &ArcCollection,
    geometry_type: GeometryType,
) -> Result<Option<Shape>, ShpsysError> {
    let paths = match shape {
        Some(Shape::Paths(paths)) => paths,
        other => return Ok(other),
    };

    let paths = edit_paths(paths, |path| {
        let Some(mut cleaned) = clean_path(&path, arcs)? else {
            return Ok(None);
        };
        if geometry_type == GeometryType::Polygon {
            remove_spikes_in_path(&mut cleaned);
            if planar_path_area(&cleaned, arcs)? == 0.0 {
                return Ok(None);
            }
        }
        Ok(Some(cleaned))
    })?;

    Ok(paths.map(Shape::Paths))
}

/// Replaces every path with the result of `f`. Paths for which `f` returns `None` are removed; if no path is left,
/// returns `None`.
pub fn edit_paths<F>(paths: Vec<Path>, mut f: F) -> Result<Option<Vec<Path>>, ShpsysError>
where
    F: FnMut(Path) -> Result<Option<Path>, ShpsysError>,
{
    let mut edited = Vec::with_capacity(paths.len());
    for path in paths {
        if let Some(path) = f(path)? {
            edited.push(path);
        }
    }

    if edited.is_empty() {
        Ok(None)
    } else {
        Ok(Some(edited))
    }
}

/// Path without references to degenerate arcs, or `None` if nothing is left.
pub fn clean_path(path: &[ArcId], arcs: &ArcCollection) -> Result<Option<Path>, ShpsysError> {
    let mut cleaned = Vec::with_capacity(path.len());
    for &id in path {
        if !arcs.arc_is_degenerate(id)? {
            cleaned.push(id);
        }
    }

    Ok((!cleaned.is_empty()).then_some(cleaned))
}

/// Removes pairs of consecutive references that go along an arc and immediately back, until there are none left.
/// The last and the first references of the path count as consecutive.
pub fn remove_spikes_in_path(ids: &mut Path) {
    loop {
        let n = ids.len();
        if n < 2 {
            return;
        }

        if ids[0] == !ids[n - 1] {
            ids.pop();
            ids.remove(0);
        } else if let Some(i) = (1..n).find(|&i| ids[i - 1] == !ids[i]) {
            ids.drain(i - 1..=i);
        } else {
            return;
        }
    }
}

/// Signed area of the ring formed by the arcs of the path. Clockwise rings are positive.
pub fn planar_path_area(ids: &[ArcId], arcs: &ArcCollection) -> Result<f64, ShpsysError> {
    let mut iter = arcs.get_shape_iter(ids)?;
    let Some(first) = iter.next() else {
        return Ok(0.0);
    };

    let mut sum = 0.0;
    let (mut bx, mut by) = (0.0, 0.0);
    for p in iter {
        let ax = p.x - first.x;
        let ay = p.y - first.y;
        sum += ax * by - bx * ay;
        bx = ax;
        by = ay;
    }
    Ok(sum / 2.0)
}
