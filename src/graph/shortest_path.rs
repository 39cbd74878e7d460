//! Shortest connecting path between two topics.
//!
//! Breadth-first search over [`NeighborResolver`] with the hierarchy treated
//! as undirected. The visited set is checked before enqueueing, so parent
//! cycles cannot keep the search alive. A store failure mid-search yields a
//! negative result with the statistics gathered so far; it never aborts the
//! caller.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::graph::neighbors::NeighborResolver;
use crate::graph::queue::FrontierQueue;
use crate::graph::resolver::TopicResolver;
use crate::store::TopicStore;
use crate::types::Topic;

/// Tag reported in [`SearchStats::algorithm`].
pub const BFS_ALGORITHM: &str = "bfs";

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Observability data for one search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    /// Number of dequeued nodes.
    pub nodes_explored: usize,
    /// Deepest BFS layer a dequeued node belonged to.
    pub max_depth: usize,
    pub elapsed_ms: f64,
    pub algorithm: String,
}

impl SearchStats {
    fn new(nodes_explored: usize, max_depth: usize, elapsed: Duration) -> Self {
        Self {
            nodes_explored,
            max_depth,
            elapsed_ms: elapsed.as_secs_f64() * 1000.0,
            algorithm: BFS_ALGORITHM.to_string(),
        }
    }
}

/// Outcome of [`ShortestPathEngine::find_shortest_path`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortestPathResult {
    pub path_exists: bool,
    /// Edge count of `path`, or -1 when no path exists.
    pub distance: i64,
    pub path: Vec<Topic>,
    pub search_stats: SearchStats,
}

impl ShortestPathResult {
    fn found(path: Vec<Topic>, stats: SearchStats) -> Self {
        Self {
            path_exists: true,
            distance: path.len() as i64 - 1,
            path,
            search_stats: stats,
        }
    }

    fn not_found(stats: SearchStats) -> Self {
        Self {
            path_exists: false,
            distance: -1,
            path: Vec::new(),
            search_stats: stats,
        }
    }

    /// Ids along the path, start first.
    pub fn path_ids(&self) -> Vec<&str> {
        self.path.iter().map(|t| t.id.as_str()).collect()
    }
}

// ---------------------------------------------------------------------------
// ShortestPathEngine
// ---------------------------------------------------------------------------

/// Runs one self-contained BFS per call.
pub struct ShortestPathEngine<'a, S: ?Sized> {
    resolver: TopicResolver<'a, S>,
    neighbors: NeighborResolver<'a, S>,
}

impl<'a, S: TopicStore + ?Sized> ShortestPathEngine<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            resolver: TopicResolver::new(store),
            neighbors: NeighborResolver::new(store),
        }
    }

    /// Shortest path from `start_id` to `end_id`.
    ///
    /// Missing endpoints give a negative result, not an error. Identical
    /// requested ids short-circuit to a zero-length path without consulting
    /// neighbors. Among equally short paths the first one reached wins,
    /// following neighbor order (parent before children, store order among
    /// siblings).
    pub fn find_shortest_path(
        &self,
        start_id: &str,
        end_id: &str,
        only_latest: bool,
    ) -> ShortestPathResult {
        let started = Instant::now();
        let stats = |explored, depth| SearchStats::new(explored, depth, started.elapsed());

        let endpoints = self
            .resolver
            .resolve_topic(start_id, only_latest)
            .and_then(|start| Ok((start, self.resolver.resolve_topic(end_id, only_latest)?)));
        let (start, end) = match endpoints {
            Ok((Some(start), Some(end))) => (start, end),
            Ok(_) => {
                tracing::debug!(start = start_id, end = end_id, "shortest path endpoint missing");
                return ShortestPathResult::not_found(stats(0, 0));
            }
            Err(e) => {
                tracing::warn!(start = start_id, end = end_id, "endpoint lookup failed: {e}");
                return ShortestPathResult::not_found(stats(0, 0));
            }
        };

        if start_id == end_id {
            return ShortestPathResult::found(vec![start], stats(0, 0));
        }

        let target = end.id;
        let start_key = start.id.clone();

        // id -> (topic, depth); doubles as the visited set.
        let mut discovered: HashMap<String, (Topic, usize)> = HashMap::new();
        // child id -> id it was discovered from
        let mut came_from: HashMap<String, String> = HashMap::new();
        let mut frontier: FrontierQueue<String> = FrontierQueue::new();

        discovered.insert(start_key.clone(), (start, 0));
        frontier.push(start_key.clone());

        let mut explored = 0usize;
        let mut max_depth = 0usize;

        while let Some(current) = frontier.pop() {
            explored += 1;
            let Some((topic, depth)) = discovered.get(&current) else {
                continue;
            };
            let depth = *depth;
            max_depth = max_depth.max(depth);

            if current == target {
                let path = reconstruct(&start_key, &target, &came_from, &mut discovered);
                let result = ShortestPathResult::found(path, stats(explored, max_depth));
                tracing::debug!(
                    distance = result.distance,
                    explored,
                    "shortest path found"
                );
                return result;
            }

            let next = match self.neighbors.neighbors(topic, only_latest) {
                Ok(next) => next,
                Err(e) => {
                    tracing::warn!(topic = %current, "neighbor lookup failed, abandoning search: {e}");
                    return ShortestPathResult::not_found(stats(explored, max_depth));
                }
            };

            for neighbor in next {
                if discovered.contains_key(&neighbor.id) {
                    continue;
                }
                let id = neighbor.id.clone();
                came_from.insert(id.clone(), current.clone());
                discovered.insert(id.clone(), (neighbor, depth + 1));
                frontier.push(id);
            }
        }

        tracing::debug!(start = start_id, end = end_id, explored, "no connecting path");
        ShortestPathResult::not_found(stats(explored, max_depth))
    }
}

/// Walk parent pointers back from `end` to `start` and return topics
/// start-first.
fn reconstruct(
    start: &str,
    end: &str,
    came_from: &HashMap<String, String>,
    discovered: &mut HashMap<String, (Topic, usize)>,
) -> Vec<Topic> {
    let mut ids = vec![end.to_string()];
    let mut cursor = end;
    while cursor != start {
        match came_from.get(cursor) {
            Some(prev) => {
                ids.push(prev.clone());
                cursor = prev;
            }
            None => break,
        }
    }
    ids.reverse();
    ids.iter()
        .filter_map(|id| discovered.remove(id).map(|(topic, _)| topic))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
