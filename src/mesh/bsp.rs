//! [BSP](https://en.wikipedia.org/wiki/Binary_space_partitioning) tree node
//! structure and the clipping operations behind boolean union.

use crate::float_types::Real;
use crate::mesh::plane::{BACK, COPLANAR, FRONT, Plane, SPANNING};
use crate::mesh::polygon::Polygon;

/// A BSP tree node holding coplanar polygons plus optional front/back
/// subtrees.
#[derive(Debug, Clone)]
pub struct Node {
    /// Splitting plane, `None` for an empty leaf.
    pub plane: Option<Plane>,
    pub front: Option<Box<Node>>,
    pub back: Option<Box<Node>>,
    /// Polygons lying exactly on `plane` after the node has been built.
    pub polygons: Vec<Polygon>,
}

impl Node {
    pub const fn new() -> Self {
        Node {
            plane: None,
            front: None,
            back: None,
            polygons: Vec::new(),
        }
    }

    pub fn from_polygons(polygons: &[Polygon]) -> Self {
        let mut node = Node::new();
        if !polygons.is_empty() {
            node.build(polygons);
        }
        node
    }

    /// Invert the tree: flip every polygon and plane, swap half-spaces.
    pub fn invert(&mut self) {
        self.polygons.iter_mut().for_each(|p| p.flip());
        if let Some(ref mut plane) = self.plane {
            plane.flip();
        }
        if let Some(ref mut front) = self.front {
            front.invert();
        }
        if let Some(ref mut back) = self.back {
            back.invert();
        }
        std::mem::swap(&mut self.front, &mut self.back);
    }

    /// Choose a splitting plane among a sample of candidate polygons,
    /// penalizing spans and front/back imbalance.
    fn pick_splitting_plane(polygons: &[Polygon]) -> Plane {
        const K_SPANS: Real = 8.0;
        const K_BALANCE: Real = 1.0;

        let mut best_plane = polygons[0].plane.clone();
        let mut best_score = Real::MAX;

        for candidate in polygons.iter().take(polygons.len().min(20)) {
            let plane = &candidate.plane;
            let mut num_front = 0i32;
            let mut num_back = 0i32;
            let mut num_spanning = 0i32;

            for poly in polygons {
                match plane.classify_polygon(poly) {
                    COPLANAR => {},
                    FRONT => num_front += 1,
                    BACK => num_back += 1,
                    SPANNING => num_spanning += 1,
                    _ => {},
                }
            }

            let score = K_SPANS * num_spanning as Real
                + K_BALANCE * ((num_front - num_back) as Real).abs();
            if score < best_score {
                best_score = score;
                best_plane = plane.clone();
            }
        }
        best_plane
    }

    /// Remove every part of `polygons` that lies inside this tree.
    /// Iterative to keep deep trees off the call stack.
    pub fn clip_polygons(&self, polygons: &[Polygon]) -> Vec<Polygon> {
        let mut result = Vec::new();
        let mut stack = vec![(self, polygons.to_vec())];

        while let Some((node, polys)) = stack.pop() {
            let Some(plane) = node.plane.as_ref() else {
                result.extend(polys);
                continue;
            };

            let mut front_polys = Vec::with_capacity(polys.len());
            let mut back_polys = Vec::with_capacity(polys.len());

            for polygon in &polys {
                let (coplanar_front, coplanar_back, mut front_parts, mut back_parts) =
                    plane.split_polygon(polygon);

                for coplanar in coplanar_front.into_iter().chain(coplanar_back) {
                    if plane.orient_plane(&coplanar.plane) == FRONT {
                        front_parts.push(coplanar);
                    } else {
                        back_parts.push(coplanar);
                    }
                }

                front_polys.append(&mut front_parts);
                back_polys.append(&mut back_parts);
            }

            match &node.front {
                Some(front_node) if !front_polys.is_empty() => {
                    stack.push((front_node, front_polys));
                },
                Some(_) => {},
                None => result.extend(front_polys),
            }

            // Polygons with no back subtree are inside the solid: dropped.
            if let Some(back_node) = &node.back {
                if !back_polys.is_empty() {
                    stack.push((back_node, back_polys));
                }
            }
        }
        result
    }

    /// Clip every polygon in this tree against `other`.
    pub fn clip_to(&mut self, other: &Node) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            node.polygons = other.clip_polygons(&node.polygons);
            if let Some(front) = node.front.as_deref_mut() {
                stack.push(front);
            }
            if let Some(back) = node.back.as_deref_mut() {
                stack.push(back);
            }
        }
    }

    /// Collect all polygons stored anywhere in the tree.
    pub fn all_polygons(&self) -> Vec<Polygon> {
        let mut result = Vec::new();
        let mut stack = vec![self];

        while let Some(node) = stack.pop() {
            result.extend_from_slice(&node.polygons);
            stack.extend(
                [&node.front, &node.back]
                    .iter()
                    .filter_map(|child| child.as_deref()),
            );
        }
        result
    }

    /// Insert polygons, extending the tree where needed.
    pub fn build(&mut self, polygons: &[Polygon]) {
        if polygons.is_empty() {
            return;
        }

        let mut stack = vec![(self, polygons.to_vec())];

        while let Some((node, polys)) = stack.pop() {
            if polys.is_empty() {
                continue;
            }

            let plane = match &node.plane {
                Some(plane) => plane.clone(),
                None => {
                    let plane = Self::pick_splitting_plane(&polys);
                    node.plane = Some(plane.clone());
                    plane
                }
            };

            let mut front = Vec::with_capacity(polys.len() / 2);
            let mut back = Vec::with_capacity(polys.len() / 2);

            for polygon in &polys {
                let (coplanar_front, coplanar_back, mut front_parts, mut back_parts) =
                    plane.split_polygon(polygon);
                node.polygons.extend(coplanar_front);
                node.polygons.extend(coplanar_back);
                front.append(&mut front_parts);
                back.append(&mut back_parts);
            }

            if !front.is_empty() {
                let front_node = node.front.get_or_insert_with(|| Box::new(Node::new()));
                stack.push((front_node, front));
            }
            if !back.is_empty() {
                let back_node = node.back.get_or_insert_with(|| Box::new(Node::new()));
                stack.push((back_node, back));
            }
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}
