use std::collections::BinaryHeap;

use lec_core::{LecError, VertexId};

use crate::cost_model::CostModel;
use crate::search::{CostSearch, FrontierEntry, NO_PARENT, SearchResult};
use crate::traits::{CostStrategy, NeighborStrategy};

impl CostSearch {
    /// Run a fuel-bounded least-cost search from `start`.
    ///
    /// Expansion never records a cumulative cost above `fuel`. On success
    /// every reached vertex holds the least cost achievable from `start`
    /// under that ceiling, and the predecessors form a tree rooted at
    /// `start`.
    ///
    /// A zero `fuel` budget yields the start alone, even when some steps
    /// cost nothing.
    ///
    /// The start vertex is not checked against the sea level; only the
    /// neighbor strategy filters vertices.
    pub fn run<C: CostStrategy, N: NeighborStrategy>(
        &mut self,
        model: &mut CostModel<'_, C, N>,
        start: VertexId,
        fuel: i32,
    ) -> Result<SearchResult<'_>, LecError> {
        let mesh = model.mesh();
        mesh.check_vertex(start)?;
        if fuel < 0 {
            return Err(LecError::NegativeFuel(fuel));
        }

        self.prepare(mesh.len());
        self.start = start;
        {
            let cur_gen = self.generation;
            let n = &mut self.nodes[start];
            n.cost = 0;
            n.distance = 0.0;
            n.parent = NO_PARENT;
            n.generation = cur_gen;
        }
        self.reached.push(start);
        if fuel == 0 {
            return Ok(self.result());
        }

        let mut open = std::mem::take(&mut self.open);
        let mut nbuf = std::mem::take(&mut self.nbuf);
        open.clear();
        open.push(FrontierEntry {
            vertex: start,
            cost: 0,
        });

        let outcome = self.expand(model, fuel, &mut open, &mut nbuf);

        self.open = open;
        self.nbuf = nbuf;
        outcome?;
        Ok(self.result())
    }

    fn expand<C: CostStrategy, N: NeighborStrategy>(
        &mut self,
        model: &mut CostModel<'_, C, N>,
        fuel: i32,
        open: &mut BinaryHeap<FrontierEntry>,
        nbuf: &mut Vec<VertexId>,
    ) -> Result<(), LecError> {
        let len = model.mesh().len();
        let cur_gen = self.generation;

        while let Some(current) = open.pop() {
            let ci = current.vertex;
            // A vertex is pushed again each time its cost improves, so older
            // entries for it are outdated and must not be expanded.
            if current.cost != self.nodes[ci].cost {
                self.stale_pops += 1;
                continue;
            }
            self.expansions += 1;
            let current_cost = current.cost;
            let current_dist = self.nodes[ci].distance;

            nbuf.clear();
            nbuf.extend_from_slice(model.neighbors(ci));

            for &ni in nbuf.iter() {
                if ni >= len {
                    return Err(LecError::InvalidNeighbor {
                        vertex: ci,
                        neighbor: ni,
                        len,
                    });
                }
                let step = model.cost(ci, ni);
                if step < 0 {
                    return Err(LecError::NegativeCost {
                        from: ci,
                        to: ni,
                        cost: step,
                    });
                }
                let tentative = current_cost.saturating_add(step);
                if tentative > fuel {
                    continue;
                }

                let seen = self.nodes[ni].generation == cur_gen;
                if seen && tentative >= self.nodes[ni].cost {
                    continue;
                }
                let distance = current_dist + model.distance(ci, ni);

                let n = &mut self.nodes[ni];
                n.cost = tentative;
                n.distance = distance;
                n.parent = ci;
                if !seen {
                    n.generation = cur_gen;
                    self.reached.push(ni);
                }

                open.push(FrontierEntry {
                    vertex: ni,
                    cost: tentative,
                });
                if let Some(limit) = self.frontier_limit {
                    if open.len() > limit {
                        return Err(LecError::FrontierExhausted {
                            start: self.start,
                            limit,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost_model::CacheCapacity;
    use crate::distance::ElevationCost;
    use crate::neighbors::SeaLevelNeighbors;
    use crate::testing::{quad_mesh, random_mesh};
    use lec_core::{DVec3, ErrorKind, Mesh};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::RngExt;

    /// Bellman-Ford relaxation over the same model, capped at `fuel`.
    fn reference<C: CostStrategy, N: NeighborStrategy>(
        model: &mut CostModel<'_, C, N>,
        start: VertexId,
        fuel: i32,
    ) -> Vec<Option<i32>> {
        let n = model.mesh().len();
        let mut best = vec![None; n];
        best[start] = Some(0);
        loop {
            let mut changed = false;
            for v in 0..n {
                let Some(cv) = best[v] else { continue };
                for w in model.neighbors(v).to_vec() {
                    let c = cv + model.cost(v, w);
                    if c <= fuel && best[w].is_none_or(|b| c < b) {
                        best[w] = Some(c);
                        changed = true;
                    }
                }
            }
            if !changed {
                return best;
            }
        }
    }

    /// A flat 100 m square (0..4) where every step is free, plus a hill
    /// vertex 4 beside it at elevation 25.
    fn flat_patch() -> Mesh {
        Mesh::new(
            vec![
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(100.0, 0.0, 0.0),
                DVec3::new(0.0, 100.0, 0.0),
                DVec3::new(100.0, 100.0, 0.0),
                DVec3::new(200.0, 0.0, 0.0),
            ],
            vec![0.0, 0.0, 0.0, 0.0, 25.0],
            vec![[0, 1, 2], [1, 3, 2], [1, 4, 3]],
        )
        .unwrap()
    }

    #[test]
    fn two_triangles_by_hand() {
        let m = quad_mesh();
        let mut model = CostModel::new(&m);
        let mut search = CostSearch::for_mesh(&m);
        let r = search.run(&mut model, 0, 1000).unwrap();

        assert_eq!(r.len(), 4);
        assert_eq!(r.predecessor(0), None);
        assert_eq!(r.predecessor(1), Some(0));
        assert_eq!(r.predecessor(2), Some(0));

        assert_eq!(r.cost(0), Some(0));
        assert_eq!(r.cost(1), Some(5));
        assert_eq!(r.cost(2), Some(4));
        assert_eq!(r.cost(3), Some(10));

        assert_eq!(r.distance(0), Some(0.0));
        assert_eq!(r.distance(1), Some(1000.0));
        assert_eq!(r.distance(2), Some(1000.0));
        assert_eq!(r.distance(3), Some(2000.0));

        assert_eq!(r.path_to(2), Some(vec![0, 2]));
        assert_eq!(r.start(), 0);
    }

    #[test]
    fn equal_costs_expand_lowest_vertex_first() {
        // Every step costs 1, so 1 and 2 tie at cost 1 and both reach 3 at
        // cost 2. Vertex 1 is expanded first and the later equal route
        // through 2 does not replace it.
        let m = quad_mesh();
        let flat = |_: &Mesh, _: VertexId, _: VertexId, _: f64| 1;
        let mut model = CostModel::with_strategies(
            &m,
            flat,
            SeaLevelNeighbors::default(),
            CacheCapacity::for_mesh(&m),
        )
        .unwrap();
        let mut search = CostSearch::for_mesh(&m);
        let r = search.run(&mut model, 0, 10).unwrap();
        assert_eq!(r.cost(3), Some(2));
        assert_eq!(r.predecessor(3), Some(1));
        assert_eq!(r.path_to(3), Some(vec![0, 1, 3]));
        assert_eq!(r.vertices(), &[0, 1, 2, 3]);
    }

    #[test]
    fn zero_fuel_reaches_only_start() {
        let m = quad_mesh();
        let mut model = CostModel::new(&m);
        let mut search = CostSearch::for_mesh(&m);
        let r = search.run(&mut model, 0, 0).unwrap();
        assert_eq!(r.len(), 1);
        let start = r.node(0).unwrap();
        assert_eq!(start.cost, 0);
        assert_eq!(start.distance, 0.0);
        assert_eq!(start.parent, None);
    }

    #[test]
    fn zero_fuel_ignores_free_steps() {
        let m = flat_patch();
        let mut model = CostModel::new(&m);
        assert_eq!(model.cost(0, 1), 0);
        let mut search = CostSearch::for_mesh(&m);
        let r = search.run(&mut model, 0, 0).unwrap();
        assert_eq!(r.vertices(), &[0]);
        assert_eq!(r.cost(0), Some(0));
        assert_eq!(r.distance(0), Some(0.0));
        assert_eq!(search.expansions, 0);
    }

    #[test]
    fn free_steps_with_positive_fuel() {
        let m = flat_patch();
        let mut model = CostModel::new(&m);
        let mut search = CostSearch::for_mesh(&m);
        for start in 0..4 {
            let expected = reference(&mut model, start, 30);
            let r = search.run(&mut model, start, 30).unwrap();
            for v in 0..m.len() {
                assert_eq!(r.cost(v), expected[v], "start {start} vertex {v}");
            }
            // The flat square is free; the hill costs floor(25 + 0.4).
            for v in 0..4 {
                assert_eq!(r.cost(v), Some(0));
            }
            assert_eq!(r.cost(4), Some(25));
            let reached = r.len();
            for node in r.iter().filter(|n| n.vertex != start) {
                let p = node.parent.unwrap();
                assert_eq!(node.cost, r.cost(p).unwrap() + model.cost(p, node.vertex));
            }
            // Each reached vertex is expanded exactly once.
            assert_eq!(search.expansions, reached);
        }
    }

    #[test]
    fn fuel_ceiling_cuts_branches() {
        let m = quad_mesh();
        let mut model = CostModel::new(&m);
        let mut search = CostSearch::for_mesh(&m);
        let r = search.run(&mut model, 0, 9).unwrap();
        assert_eq!(r.len(), 3);
        assert!(!r.contains(3));
        assert_eq!(r.cost(3), None);
        assert_eq!(r.path_to(3), None);
    }

    #[test]
    fn isolated_vertex() {
        let m = Mesh::new(
            vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::new(9.0, 9.0, 0.0)],
            vec![1.0; 4],
            vec![[0, 1, 2]],
        )
        .unwrap();
        let mut model = CostModel::new(&m);
        let mut search = CostSearch::for_mesh(&m);
        let r = search.run(&mut model, 3, 500).unwrap();
        assert_eq!(r.vertices(), &[3]);
    }

    #[test]
    fn underwater_start_still_runs() {
        // The start sits below sea level; its neighbors do not.
        let m = Mesh::new(
            vec![DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0), DVec3::new(0.0, 10.0, 0.0)],
            vec![-5.0, 1.0, 2.0],
            vec![[0, 1, 2]],
        )
        .unwrap();
        let mut model = CostModel::new(&m);
        let mut search = CostSearch::for_mesh(&m);
        let r = search.run(&mut model, 0, 100).unwrap();
        assert_eq!(r.len(), 3);
        assert_eq!(r.cost(1), Some(6));
        assert_eq!(r.cost(2), Some(7));
        // Nothing leads back into the water.
        assert!(model.neighbors(1).iter().all(|&n| n != 0));
    }

    #[test]
    fn rejects_bad_start_and_fuel() {
        let m = quad_mesh();
        let mut model = CostModel::new(&m);
        let mut search = CostSearch::for_mesh(&m);
        let err = search.run(&mut model, 7, 10).err().unwrap();
        assert_eq!(err, LecError::InvalidVertex { vertex: 7, len: 4 });
        assert_eq!(err.kind(), ErrorKind::PreconditionViolation);
        let err = search.run(&mut model, 0, -1).err().unwrap();
        assert_eq!(err, LecError::NegativeFuel(-1));
    }

    #[test]
    fn stale_entries_are_discarded() {
        // 0 -> 2 directly costs 10, via 1 it costs 2: vertex 2 is pushed
        // twice and its first entry becomes stale.
        let m = Mesh::new(vec![DVec3::ZERO, DVec3::X, DVec3::Y], vec![0.0; 3], vec![[0, 1, 2]])
            .unwrap();
        let table = |_: &Mesh, a: VertexId, b: VertexId, _: f64| match (a.min(b), a.max(b)) {
            (0, 2) => 10,
            _ => 1,
        };
        let mut model = CostModel::with_strategies(
            &m,
            table,
            SeaLevelNeighbors::default(),
            CacheCapacity::for_mesh(&m),
        )
        .unwrap();
        let mut search = CostSearch::for_mesh(&m);
        let r = search.run(&mut model, 0, 100).unwrap();
        assert_eq!(r.cost(2), Some(2));
        assert_eq!(r.predecessor(2), Some(1));
        assert_eq!(r.len(), 3);
        assert_eq!(search.stale_pops(), 1);
    }

    #[test]
    fn negative_cost_is_a_configuration_error() {
        let m = quad_mesh();
        let downhill = |_: &Mesh, _: VertexId, _: VertexId, _: f64| -1;
        let mut model = CostModel::with_strategies(
            &m,
            downhill,
            SeaLevelNeighbors::default(),
            CacheCapacity::for_mesh(&m),
        )
        .unwrap();
        let mut search = CostSearch::for_mesh(&m);
        let err = search.run(&mut model, 0, 100).err().unwrap();
        assert!(matches!(err, LecError::NegativeCost { from: 0, cost: -1, .. }));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn out_of_range_neighbor_is_a_configuration_error() {
        let m = quad_mesh();
        let wild = |_: &Mesh, _: VertexId, buf: &mut Vec<VertexId>| buf.push(99);
        let mut model = CostModel::with_strategies(
            &m,
            ElevationCost::default(),
            wild,
            CacheCapacity::for_mesh(&m),
        )
        .unwrap();
        let mut search = CostSearch::for_mesh(&m);
        let err = search.run(&mut model, 1, 100).err().unwrap();
        assert_eq!(
            err,
            LecError::InvalidNeighbor {
                vertex: 1,
                neighbor: 99,
                len: 4
            }
        );
    }

    #[test]
    fn frontier_limit() {
        let m = quad_mesh();
        let mut model = CostModel::new(&m);
        let mut search = CostSearch::for_mesh(&m).with_frontier_limit(1);
        let err = search.run(&mut model, 0, 1000).err().unwrap();
        assert_eq!(err, LecError::FrontierExhausted { start: 0, limit: 1 });
        assert_eq!(err.kind(), ErrorKind::ResourceExhaustion);

        // A failed search leaves the state reusable.
        search.set_frontier_limit(None);
        assert_eq!(search.run(&mut model, 0, 1000).unwrap().len(), 4);
    }

    #[test]
    fn reuse_matches_fresh_state() {
        let mut rng = StdRng::seed_from_u64(11);
        let m = random_mesh(&mut rng, 7, 6);
        let mut model = CostModel::new(&m);
        let mut reused = CostSearch::for_mesh(&m);
        for start in m.vertices_at_or_above(0.0) {
            let expected: Vec<_> = {
                let mut fresh = CostSearch::new(0);
                let mut fresh_model = CostModel::new(&m);
                fresh.run(&mut fresh_model, start, 60).unwrap().iter().collect()
            };
            let got: Vec<_> = reused.run(&mut model, start, 60).unwrap().iter().collect();
            assert_eq!(got, expected, "start {start}");
        }
    }

    #[test]
    fn agrees_with_brute_force() {
        let mut rng = StdRng::seed_from_u64(2024);
        for round in 0..25 {
            let w = rng.random_range(2..8usize);
            let h = rng.random_range(2..8usize);
            let m = random_mesh(&mut rng, w, h);
            let fuel = rng.random_range(1..120);
            let mut model = CostModel::new(&m);
            let mut search = CostSearch::for_mesh(&m);

            for start in 0..m.len() {
                let expected = reference(&mut model, start, fuel);
                let r = search.run(&mut model, start, fuel).unwrap();
                for v in 0..m.len() {
                    assert_eq!(r.cost(v), expected[v], "round {round} start {start} vertex {v}");
                }
                // Every tree edge is a real step whose cost and distance add up.
                for node in r.iter() {
                    assert!(node.cost <= fuel);
                    let Some(p) = node.parent else {
                        assert_eq!(node.vertex, start);
                        continue;
                    };
                    let parent = r.node(p).unwrap();
                    assert!(parent.cost <= node.cost);
                    assert_eq!(node.cost, parent.cost + model.cost(p, node.vertex));
                    let step = model.distance(p, node.vertex);
                    assert!((node.distance - parent.distance - step).abs() < 1e-9);
                }
            }
        }
    }
}
