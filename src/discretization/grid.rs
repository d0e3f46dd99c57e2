//! Three-region collocation grid for the 1D cell domain.

use thiserror::Error;

/// Which part of the cell a node belongs to. Interface nodes belong to the
/// adjacent electrode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Anode,
    Separator,
    Cathode,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// The node count cannot give every region its interface node plus at
    /// least one interior node.
    #[error(
        "invalid discretization: {nodes} nodes cannot represent the three-region \
         layout for these widths (each region needs an interior node)"
    )]
    InvalidDiscretization { nodes: usize },
}

/// The computational grid: `n_nodes` collocation points across [0, L], with
/// the anode/separator interface at node `sep_node` and the
/// separator/cathode interface at node `cath_node`.
///
/// Node ordering is fixed: anode nodes ascending by position, then separator
/// nodes, then cathode nodes. Spacing is uniform within each region but
/// differs between regions, since the region widths are independent inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct CellGrid {
    pub n_nodes: usize,
    pub sep_node: usize,
    pub cath_node: usize,
    pub dx_anode: f64,
    pub dx_separator: f64,
    pub dx_cathode: f64,
    pub positions: Vec<f64>,
}

impl CellGrid {
    /// Place `n_nodes` nodes over the three regions. The interface indices
    /// are the node counts proportional to the cumulative width fractions.
    pub fn build(
        anode_width: f64,
        separator_width: f64,
        cathode_width: f64,
        n_nodes: usize,
    ) -> Result<Self, GridError> {
        let total = anode_width + separator_width + cathode_width;
        let sep_node = ((anode_width / total) * n_nodes as f64) as usize;
        let cath_node = (((anode_width + separator_width) / total) * n_nodes as f64) as usize;

        // Each region keeps its interface plus one interior node; the
        // stencil below is undefined otherwise.
        let shape_ok = n_nodes >= 7
            && sep_node >= 2
            && cath_node >= sep_node + 2
            && n_nodes >= cath_node + 3;
        if !shape_ok {
            return Err(GridError::InvalidDiscretization { nodes: n_nodes });
        }

        let dx_anode = anode_width / sep_node as f64;
        let dx_separator = separator_width / (cath_node - sep_node) as f64;
        let dx_cathode = cathode_width / (n_nodes - 1 - cath_node) as f64;

        let mut positions = Vec::with_capacity(n_nodes);
        for i in 0..n_nodes {
            let x = if i <= sep_node {
                i as f64 * dx_anode
            } else if i <= cath_node {
                anode_width + (i - sep_node) as f64 * dx_separator
            } else {
                anode_width + separator_width + (i - cath_node) as f64 * dx_cathode
            };
            positions.push(x);
        }

        Ok(Self {
            n_nodes,
            sep_node,
            cath_node,
            dx_anode,
            dx_separator,
            dx_cathode,
            positions,
        })
    }

    pub fn region_of(&self, node: usize) -> Region {
        if node <= self.sep_node {
            Region::Anode
        } else if node < self.cath_node {
            Region::Separator
        } else {
            Region::Cathode
        }
    }

    /// Grid spacing of the region owning `node`.
    pub fn dx_of(&self, node: usize) -> f64 {
        match self.region_of(node) {
            Region::Anode => self.dx_anode,
            Region::Separator => self.dx_separator,
            Region::Cathode => self.dx_cathode,
        }
    }
}
