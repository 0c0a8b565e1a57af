//! Seeded random forest over dense feature vectors with string labels.
//!
//! Each tree is grown on a bootstrap sample, splitting on `feature <= threshold`
//! by Gini impurity with a random feature subset per node. Prediction averages
//! the leaf class distributions across trees.

use std::collections::BTreeSet;

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Forest hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_trees: usize,
    /// Features examined per split. `None` means `floor(sqrt(width))`.
    pub max_features: Option<usize>,
    pub min_samples_split: usize,
    pub max_depth: Option<usize>,
    pub bootstrap: bool,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_features: None,
            min_samples_split: 2,
            max_depth: None,
            bootstrap: true,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        distribution: Vec<f64>,
    },
}

/// A single classification tree stored as a flat node arena; node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    fn distribution(&self, features: &[f64]) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                Node::Leaf { distribution } => return distribution,
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn is_consistent(&self, n_features: usize, n_classes: usize) -> bool {
        let n_nodes = self.nodes.len();
        n_nodes > 0
            && self.nodes.iter().enumerate().all(|(idx, node)| match node {
                // children are always pushed after their parent, so this also rules out cycles
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    *feature < n_features
                        && threshold.is_finite()
                        && *left > idx
                        && *right > idx
                        && *left < n_nodes
                        && *right < n_nodes
                }
                Node::Leaf { distribution } => distribution.len() == n_classes,
            })
    }
}

struct Split {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

struct TreeBuilder<'a> {
    x: &'a [Vec<f64>],
    y: &'a [usize],
    n_classes: usize,
    max_features: usize,
    min_samples_split: usize,
    max_depth: Option<usize>,
    nodes: Vec<Node>,
}

impl TreeBuilder<'_> {
    fn grow(mut self, sample: &[usize], rng: &mut StdRng) -> DecisionTree {
        self.build(sample, 0, rng);
        DecisionTree { nodes: self.nodes }
    }

    fn build(&mut self, indices: &[usize], depth: usize, rng: &mut StdRng) -> usize {
        let counts = self.class_counts(indices);
        let is_pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
        let depth_reached = self.max_depth.is_some_and(|max| depth >= max);

        if is_pure || indices.len() < self.min_samples_split || depth_reached {
            return self.push_leaf(&counts, indices.len());
        }

        let Some(split) = self.best_split(indices, &counts, rng) else {
            return self.push_leaf(&counts, indices.len());
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .copied()
            .partition(|&i| self.x[i][split.feature] <= split.threshold);

        let slot = self.nodes.len();
        self.nodes.push(Node::Leaf {
            distribution: Vec::new(),
        });

        let left = self.build(&left_idx, depth + 1, rng);
        let right = self.build(&right_idx, depth + 1, rng);

        self.nodes[slot] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        slot
    }

    /// Scans a random permutation of the features, stopping once `max_features`
    /// non-constant features have been examined.
    fn best_split(&self, indices: &[usize], counts: &[usize], rng: &mut StdRng) -> Option<Split> {
        let n = indices.len();
        let n_features = self.x.first().map_or(0, Vec::len);

        let mut features: Vec<usize> = (0..n_features).collect();
        features.shuffle(rng);

        let mut best: Option<Split> = None;
        let mut visited = 0;

        for feature in features {
            if visited >= self.max_features && best.is_some() {
                break;
            }

            let mut column: Vec<(f64, usize)> = indices
                .iter()
                .map(|&i| (self.x[i][feature], self.y[i]))
                .collect();
            column.sort_by(|a, b| a.0.total_cmp(&b.0));

            if column[0].0 == column[n - 1].0 {
                continue;
            }
            visited += 1;

            let mut left = vec![0usize; self.n_classes];
            let mut right = counts.to_vec();

            for k in 1..n {
                let (prev_value, prev_class) = column[k - 1];
                left[prev_class] += 1;
                right[prev_class] -= 1;

                let value = column[k].0;
                if prev_value == value {
                    continue;
                }

                let impurity = (k as f64 * gini(&left, k)
                    + (n - k) as f64 * gini(&right, n - k))
                    / n as f64;

                let improves = match &best {
                    Some(b) => impurity < b.impurity,
                    None => true,
                };
                if improves {
                    best = Some(Split {
                        feature,
                        threshold: midpoint(prev_value, value),
                        impurity,
                    });
                }
            }
        }

        best
    }

    fn class_counts(&self, indices: &[usize]) -> Vec<usize> {
        let mut counts = vec![0usize; self.n_classes];
        for &i in indices {
            counts[self.y[i]] += 1;
        }
        counts
    }

    fn push_leaf(&mut self, counts: &[usize], total: usize) -> usize {
        let distribution = counts
            .iter()
            .map(|&c| c as f64 / total.max(1) as f64)
            .collect();
        self.nodes.push(Node::Leaf { distribution });
        self.nodes.len() - 1
    }
}

fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum::<f64>()
}

/// Midpoint that always separates `lo` from `hi`, even for adjacent floats.
fn midpoint(lo: f64, hi: f64) -> f64 {
    let mid = lo / 2.0 + hi / 2.0;
    if mid >= hi || !mid.is_finite() {
        lo
    } else {
        mid
    }
}

/// Ensemble of decision trees voting by averaged class probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    classes: Vec<String>,
    n_features: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn fit(x: &[Vec<f64>], labels: &[String], params: &ForestParams) -> Result<Self, ModelError> {
        if x.is_empty() || params.n_trees == 0 {
            return Err(ModelError::EmptyTrainingSet);
        }
        if x.len() != labels.len() {
            return Err(ModelError::LabelCountMismatch {
                rows: x.len(),
                labels: labels.len(),
            });
        }

        let n_features = x[0].len();
        if let Some((row, bad)) = x.iter().enumerate().find(|(_, r)| r.len() != n_features) {
            return Err(ModelError::RaggedFeatures {
                row,
                expected: n_features,
                got: bad.len(),
            });
        }

        let classes: Vec<String> = labels
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let y: Vec<usize> = labels
            .iter()
            .map(|label| classes.binary_search(label).unwrap_or_default())
            .collect();

        let default_max = (n_features as f64).sqrt().floor() as usize;
        let max_features = params
            .max_features
            .unwrap_or(default_max)
            .clamp(1, n_features.max(1));

        let n = x.len();
        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut trees = Vec::with_capacity(params.n_trees);

        for _ in 0..params.n_trees {
            let sample: Vec<usize> = if params.bootstrap {
                (0..n).map(|_| rng.random_range(0..n)).collect()
            } else {
                (0..n).collect()
            };

            let builder = TreeBuilder {
                x,
                y: &y,
                n_classes: classes.len(),
                max_features,
                min_samples_split: params.min_samples_split.max(2),
                max_depth: params.max_depth,
                nodes: Vec::new(),
            };
            trees.push(builder.grow(&sample, &mut rng));
        }

        Ok(RandomForest {
            classes,
            n_features,
            trees,
        })
    }

    /// Sorted class labels; column order of [`predict_proba`](Self::predict_proba).
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Input width the forest was fitted on.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, ModelError> {
        if features.len() != self.n_features {
            return Err(ModelError::FeatureLengthMismatch {
                expected: self.n_features,
                got: features.len(),
            });
        }

        let mut proba = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            for (p, d) in proba.iter_mut().zip(tree.distribution(features)) {
                *p += d;
            }
        }

        let n_trees = self.trees.len() as f64;
        for p in &mut proba {
            *p /= n_trees;
        }
        Ok(proba)
    }

    /// Most probable label. Ties go to the first label in sorted order.
    pub fn predict(&self, features: &[f64]) -> Result<&str, ModelError> {
        let proba = self.predict_proba(features)?;

        let mut best = 0;
        for (idx, &p) in proba.iter().enumerate() {
            if p > proba[best] {
                best = idx;
            }
        }
        Ok(&self.classes[best])
    }

    pub(crate) fn is_consistent(&self) -> bool {
        !self.classes.is_empty()
            && !self.trees.is_empty()
            && self
                .trees
                .iter()
                .all(|t| t.is_consistent(self.n_features, self.classes.len()))
    }
}
