//! # Barnes–Hut Octree
//!
//! Approximates self-gravity of the particle system in `O(N log N)`.
//! Space is recursively split into octants; each node stores the total mass
//! and centre of mass of its subtree so a distant group of particles can be
//! treated as a single pseudo-particle.
//!
//! - Nodes live in one `Vec` and refer to their children by index.
//! - A leaf normally holds one particle. Particles that can't be separated
//!   before `MAX_DEPTH` (coincident positions) share a leaf.
//! - The opening criterion is `size / dist < theta`; `theta = 0` reduces to
//!   the exact direct sum.

use crate::simulation::states::{NVec3, ParticleSystem};

/// Depth at which subdivision stops and a leaf starts holding several particles
const MAX_DEPTH: usize = 64;

/// A single octree node.
///
/// A node is either empty, a leaf (`particles` non-empty, no children) or
/// internal (children present, `particles` empty).
#[derive(Debug, Clone)]
pub struct OctreeNode {
    pub mass: f64,
    pub com: NVec3,
    pub bbox_min: NVec3,
    pub bbox_max: NVec3,
    pub children: [Option<usize>; 8], // indices into Octree::nodes
    pub particles: Vec<usize>, // particle indices held by a leaf
}

impl OctreeNode {
    fn empty(bbox_min: NVec3, bbox_max: NVec3) -> Self {
        Self {
            mass: 0.0,
            com: NVec3::zeros(),
            bbox_min,
            bbox_max,
            children: [None; 8],
            particles: Vec::new(),
        }
    }

    pub fn is_internal(&self) -> bool {
        self.children.iter().any(|c| c.is_some())
    }

    /// Largest edge of the node's box
    pub fn size(&self) -> f64 {
        let s = self.bbox_max - self.bbox_min;
        s.x.max(s.y).max(s.z)
    }
}

/// Force-law settings shared by every node visited during a tree walk
#[allow(non_snake_case)]
#[derive(Debug, Clone, Copy)]
pub struct TreeWalk {
    pub G: f64,
    pub eps2: f64,
    pub theta: f64,
}

/// A complete octree built over a particle system.
#[derive(Debug, Clone)]
pub struct Octree {
    pub nodes: Vec<OctreeNode>,
    pub root: usize,
}

impl Octree {
    /// Build an octree from the current state of the system.
    ///
    /// 1. Computes a cubic bounding box enclosing all particles.
    /// 2. Inserts each particle, subdividing leaves as needed.
    /// 3. Fills in total mass and centre of mass bottom-up.
    pub fn build(sys: &ParticleSystem) -> Self {
        let (bbox_min, bbox_max) = compute_global_bbox(sys);
        let root = 0;
        let mut tree = Octree {
            nodes: vec![OctreeNode::empty(bbox_min, bbox_max)],
            root,
        };

        for i in 0..sys.particles.len() {
            tree.insert(root, i, sys, 0);
        }

        tree.compute_mass_and_com(sys, root);
        tree
    }

    /// Net gravitational acceleration on particle `i`
    pub fn acceleration_on(&self, i: usize, sys: &ParticleSystem, walk: &TreeWalk) -> NVec3 {
        let pos_i = sys.particles[i].x;
        let mut acc = NVec3::zeros();
        self.traverse(self.root, i, pos_i, sys, walk, &mut acc);
        acc
    }

    /// Total mass held by the tree
    pub fn total_mass(&self) -> f64 {
        self.nodes[self.root].mass
    }

    // helpers ==============================================================================

    /// Insert particle `idx` below `node_idx`.
    ///
    /// - empty leaf: store it here
    /// - occupied leaf: subdivide, push the resident particles down, then descend
    /// - internal node: descend into the octant containing the particle
    fn insert(&mut self, node_idx: usize, idx: usize, sys: &ParticleSystem, depth: usize) {
        let bbox_min = self.nodes[node_idx].bbox_min;
        let bbox_max = self.nodes[node_idx].bbox_max;

        if !self.nodes[node_idx].is_internal() {
            if self.nodes[node_idx].particles.is_empty() || depth >= MAX_DEPTH {
                self.nodes[node_idx].particles.push(idx);
                return;
            }

            // occupied leaf: move residents into children
            let residents = std::mem::take(&mut self.nodes[node_idx].particles);
            self.subdivide(node_idx, bbox_min, bbox_max);
            for r in residents {
                self.insert(node_idx, r, sys, depth);
            }
        }

        let octant = child_index_for_point(&sys.particles[idx].x, &bbox_min, &bbox_max);
        let child = match self.nodes[node_idx].children[octant] {
            Some(c) => c,
            None => {
                let (cmin, cmax) = child_bbox(&bbox_min, &bbox_max, octant);
                let c = self.nodes.len();
                self.nodes.push(OctreeNode::empty(cmin, cmax));
                self.nodes[node_idx].children[octant] = Some(c);
                c
            }
        };
        self.insert(child, idx, sys, depth + 1);
    }

    /// Split a node's box into 8 octants and allocate an empty child for each.
    fn subdivide(&mut self, node_idx: usize, bbox_min: NVec3, bbox_max: NVec3) {
        for octant in 0..8 {
            let (cmin, cmax) = child_bbox(&bbox_min, &bbox_max, octant);
            let c = self.nodes.len();
            self.nodes.push(OctreeNode::empty(cmin, cmax));
            self.nodes[node_idx].children[octant] = Some(c);
        }
    }

    /// Bottom-up pass writing total mass and mass-weighted COM into every node.
    fn compute_mass_and_com(&mut self, sys: &ParticleSystem, node_idx: usize) {
        let mut mass = 0.0;
        let mut com = NVec3::zeros();

        for &pidx in &self.nodes[node_idx].particles {
            let p = &sys.particles[pidx];
            mass += p.m;
            com += p.x * p.m;
        }

        let children = self.nodes[node_idx].children; // [Option<usize>; 8] is Copy
        for child in children.iter().flatten() {
            self.compute_mass_and_com(sys, *child);
            let cn = &self.nodes[*child];
            if cn.mass > 0.0 {
                mass += cn.mass;
                com += cn.com * cn.mass;
            }
        }

        if mass > 0.0 {
            com /= mass;
        }

        let node = &mut self.nodes[node_idx];
        node.mass = mass;
        node.com = com;
    }

    /// Accumulate the acceleration at `pos_i` from the subtree under `node_idx`.
    ///
    /// Leaves interact exactly (skipping `target` itself). Internal nodes are
    /// either collapsed to their COM when `size / dist < theta` or opened.
    fn traverse(
        &self,
        node_idx: usize,
        target: usize,
        pos_i: NVec3,
        sys: &ParticleSystem,
        walk: &TreeWalk,
        acc: &mut NVec3,
    ) {
        let node = &self.nodes[node_idx];
        if node.mass == 0.0 {
            return;
        }

        if !node.is_internal() {
            for &pidx in &node.particles {
                if pidx == target {
                    continue; // don't self-interact
                }
                let p = &sys.particles[pidx];
                *acc += softened_pull(p.x - pos_i, p.m, walk);
            }
            return;
        }

        let r = node.com - pos_i;
        let dist = r.norm();
        if dist > 0.0 && node.size() / dist < walk.theta {
            // far enough away: the node acts as one mass at its COM
            *acc += softened_pull(r, node.mass, walk);
        } else {
            for child in node.children.iter().flatten() {
                self.traverse(*child, target, pos_i, sys, walk, acc);
            }
        }
    }
}

/// `G m r / (|r|^2 + eps2)^(3/2)`
fn softened_pull(r: NVec3, m: f64, walk: &TreeWalk) -> NVec3 {
    let d2 = r.dot(&r) + walk.eps2;
    if d2 == 0.0 {
        return NVec3::zeros();
    }
    let inv_r = d2.sqrt().recip();
    let inv_r3 = inv_r * inv_r * inv_r;
    r * (walk.G * m * inv_r3)
}

// helpers ===========================================================================

/// Cubic bounding box enclosing every particle.
///
/// The axis-aligned box is grown into a cube around its centre so node
/// size is the same along every axis.
fn compute_global_bbox(sys: &ParticleSystem) -> (NVec3, NVec3) {
    if sys.particles.is_empty() {
        return (NVec3::zeros(), NVec3::zeros());
    }

    let mut min = NVec3::repeat(f64::INFINITY);
    let mut max = NVec3::repeat(f64::NEG_INFINITY);
    for p in &sys.particles {
        min = min.inf(&p.x);
        max = max.sup(&p.x);
    }

    let center = (min + max) * 0.5;
    let half = (max - min) * 0.5;
    let h = NVec3::repeat(half.x.max(half.y).max(half.z));
    (center - h, center + h)
}

/// Octant of `p` inside `[bbox_min, bbox_max]`.
///
/// Bit 0 is x, bit 1 is y, bit 2 is z; a set bit means the upper half.
fn child_index_for_point(p: &NVec3, bbox_min: &NVec3, bbox_max: &NVec3) -> usize {
    let center = (bbox_min + bbox_max) * 0.5;
    let mut idx = 0;

    if p.x >= center.x { idx |= 1; } // bit 0
    if p.y >= center.y { idx |= 2; } // bit 1
    if p.z >= center.z { idx |= 4; } // bit 2

    idx
}

/// Box of octant `octant` of the parent box, same bit layout as `child_index_for_point`.
fn child_bbox(parent_min: &NVec3, parent_max: &NVec3, octant: usize) -> (NVec3, NVec3) {
    let center = (parent_min + parent_max) * 0.5;
    let mut min = *parent_min;
    let mut max = *parent_max;

    for axis in 0..3 {
        if octant & (1 << axis) == 0 {
            max[axis] = center[axis];
        } else {
            min[axis] = center[axis];
        }
    }

    (min, max)
}
