//! Buchheim et al. tidy tree walk.
//!
//! Field names follow the paper and d3-hierarchy: `z` prelim, `m` modifier, `c` change,
//! `s` shift, `t` thread, `a` ancestor.

use crate::{Hierarchy, NodeId, Position, TidyOptions};

#[derive(Debug, Clone)]
struct Walker {
    parent: usize,
    children: Vec<usize>,
    /// Index among siblings.
    i: usize,
    z: f64,
    m: f64,
    c: f64,
    s: f64,
    t: Option<usize>,
    a: usize,
    /// Default ancestor used while apportioning this node's children.
    default_ancestor: Option<usize>,
}

struct Walk<'h> {
    h: &'h Hierarchy,
    opts: &'h TidyOptions,
    w: Vec<Walker>,
}

impl Walk<'_> {
    fn separation(&self, a: usize, b: usize) -> f64 {
        if self.h.parent(NodeId(a)) == self.h.parent(NodeId(b)) {
            self.opts.sibling_separation
        } else {
            self.opts.cousin_separation
        }
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        self.w[v].children.first().copied().or(self.w[v].t)
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        self.w[v].children.last().copied().or(self.w[v].t)
    }

    fn next_ancestor(&self, vim: usize, v: usize, ancestor: usize) -> usize {
        let a = self.w[vim].a;
        if self.w[a].parent == self.w[v].parent {
            a
        } else {
            ancestor
        }
    }

    fn move_subtree(&mut self, wm: usize, wp: usize, shift: f64) {
        let change = shift / (self.w[wp].i as f64 - self.w[wm].i as f64);
        self.w[wp].c -= change;
        self.w[wp].s += shift;
        self.w[wm].c += change;
        self.w[wp].z += shift;
        self.w[wp].m += shift;
    }

    fn execute_shifts(&mut self, v: usize) {
        let mut shift = 0.0;
        let mut change = 0.0;
        for idx in (0..self.w[v].children.len()).rev() {
            let child = self.w[v].children[idx];
            let node = &mut self.w[child];
            node.z += shift;
            node.m += shift;
            change += node.c;
            shift += node.s + change;
        }
    }

    fn first_walk(&mut self, v: usize) {
        let parent = self.w[v].parent;
        let left = match self.w[v].i {
            0 => None,
            i => Some(self.w[parent].children[i - 1]),
        };

        if let (Some(&first), Some(&last)) = (self.w[v].children.first(), self.w[v].children.last())
        {
            self.execute_shifts(v);
            let midpoint = (self.w[first].z + self.w[last].z) / 2.0;
            if let Some(l) = left {
                self.w[v].z = self.w[l].z + self.separation(v, l);
                self.w[v].m = self.w[v].z - midpoint;
            } else {
                self.w[v].z = midpoint;
            }
        } else if let Some(l) = left {
            self.w[v].z = self.w[l].z + self.separation(v, l);
        }

        let first_sibling = self.w[parent].children[0];
        let ancestor = self.w[parent].default_ancestor.unwrap_or(first_sibling);
        let ancestor = self.apportion(v, left, ancestor);
        self.w[parent].default_ancestor = Some(ancestor);
    }

    fn apportion(&mut self, v: usize, left: Option<usize>, mut ancestor: usize) -> usize {
        let Some(left) = left else {
            return ancestor;
        };

        let mut vip = v;
        let mut vop = v;
        let mut vim = left;
        let mut vom = self.w[self.w[vip].parent].children[0];
        let mut sip = self.w[vip].m;
        let mut sop = self.w[vop].m;
        let mut sim = self.w[vim].m;
        let mut som = self.w[vom].m;

        let (mut next_im, mut next_ip) = (self.next_right(vim), self.next_left(vip));
        while let (Some(im), Some(ip)) = (next_im, next_ip) {
            vim = im;
            vip = ip;
            let (Some(om), Some(op)) = (self.next_left(vom), self.next_right(vop)) else {
                break;
            };
            vom = om;
            vop = op;
            self.w[vop].a = v;

            let shift = self.w[vim].z + sim - self.w[vip].z - sip + self.separation(vim, vip);
            if shift > 0.0 {
                let wm = self.next_ancestor(vim, v, ancestor);
                self.move_subtree(wm, v, shift);
                sip += shift;
                sop += shift;
            }
            sim += self.w[vim].m;
            sip += self.w[vip].m;
            som += self.w[vom].m;
            sop += self.w[vop].m;

            next_im = self.next_right(vim);
            next_ip = self.next_left(vip);
        }

        if next_im.is_some() && self.next_right(vop).is_none() {
            self.w[vop].t = next_im;
            self.w[vop].m += sim - sop;
        }
        if next_ip.is_some() && self.next_left(vom).is_none() {
            self.w[vom].t = next_ip;
            self.w[vom].m += sip - som;
            ancestor = v;
        }
        ancestor
    }
}

/// Positions every node of `h`; the result is indexed by [`NodeId::index`].
pub fn layout(h: &Hierarchy, opts: &TidyOptions) -> Vec<Position> {
    let n = h.len();
    if n == 0 {
        return Vec::new();
    }

    // One walker per node plus a virtual parent above the root at index `n`.
    let virtual_root = n;
    let mut w: Vec<Walker> = (0..=n)
        .map(|idx| Walker {
            parent: virtual_root,
            children: Vec::new(),
            i: 0,
            z: 0.0,
            m: 0.0,
            c: 0.0,
            s: 0.0,
            t: None,
            a: idx,
            default_ancestor: None,
        })
        .collect();
    w[virtual_root].children.push(h.root().0);
    for idx in 0..n {
        let id = NodeId(idx);
        if let Some(p) = h.parent(id) {
            w[idx].parent = p.0;
        }
        for (i, child) in h.children(id).iter().enumerate() {
            w[idx].children.push(child.0);
            w[child.0].i = i;
        }
    }

    let mut walk = Walk { h, opts, w };
    for id in h.post_order() {
        walk.first_walk(id.0);
    }

    let root = h.root().0;
    walk.w[virtual_root].m = -walk.w[root].z;

    let (dx, dy) = opts.node_size;
    let mut out = vec![Position::default(); n];
    for id in h.breadth_first() {
        let v = id.0;
        let parent_m = walk.w[walk.w[v].parent].m;
        walk.w[v].m += parent_m;
        let depth = h.depth(id);
        out[v] = Position {
            x: (walk.w[v].z + parent_m) * dx,
            y: depth as f64 * dy,
            depth,
        };
    }
    out
}
