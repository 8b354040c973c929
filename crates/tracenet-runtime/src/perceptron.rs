//! Multilayer perceptron builder.

use crate::layer::{FanOut, Layer};
use crate::network::{require_sizes, Network};
use crate::table::IdentityTable;
use tracenet_core::error::Result;
use tracing::debug;

impl Network {
    /// Build a feed-forward chain of layers with the given sizes.
    ///
    /// The first size is the input layer, the last the output layer and
    /// everything between is hidden; at least three sizes are required.
    /// Each layer is projected onto the next with [`FanOut::Auto`].
    ///
    /// ```rust
    /// use tracenet_runtime::prelude::*;
    ///
    /// let mut net = Network::perceptron(IdentityTable::with_seed(1), &[2, 3, 1]).unwrap();
    /// assert_eq!(net.activate(&[0.0, 1.0]).unwrap().len(), 1);
    /// ```
    pub fn perceptron(mut table: IdentityTable, sizes: &[usize]) -> Result<Network> {
        require_sizes(sizes, 3, "a perceptron")?;
        let last = sizes.len() - 1;

        let mut input = Layer::new(&mut table, sizes[0]);
        let output = Layer::new(&mut table, sizes[last]);
        let mut hidden: Vec<Layer> = sizes[1..last]
            .iter()
            .map(|&size| Layer::new(&mut table, size))
            .collect();

        let mut previous = &mut input;
        for layer in hidden.iter_mut() {
            previous.project(&mut table, layer, FanOut::Auto)?;
            previous = layer;
        }
        previous.project(&mut table, &output, FanOut::Auto)?;

        debug!(?sizes, "built perceptron");
        Network::new(table, input, hidden, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracenet_core::error::NetworkError;

    #[test]
    fn fewer_than_three_sizes_is_invalid() {
        let result = Network::perceptron(IdentityTable::with_seed(1), &[2, 1]);
        assert!(matches!(result, Err(NetworkError::InvalidTopology(_))));
    }

    #[test]
    fn layers_are_chained_all_to_all() {
        let net = Network::perceptron(IdentityTable::with_seed(1), &[2, 3, 4, 1]).unwrap();
        let stats = net.stats();
        assert_eq!(stats.hidden_sizes, vec![3, 4]);
        assert_eq!(stats.neurons, 10);
        assert_eq!(stats.connections, 10 + 2 * 3 + 3 * 4 + 4);
        assert_eq!(net.input().connected_to().len(), 1);
        assert_eq!(net.hidden()[0].connected_to().len(), 1);
        assert_eq!(net.hidden()[1].connected_to().len(), 1);
    }
}
