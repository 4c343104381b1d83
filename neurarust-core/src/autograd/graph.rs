use crate::autograd::grad_mode::NoGradGuard;
use crate::error::NeuraRustError;
use crate::ops::arithmetic::add_op;
use crate::tensor::{zeros_like, Tensor};
use crate::tensor_data::TensorData;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Identity of a node in the computation graph: the address of its shared `TensorData`.
///
/// Only used as a map key; the graph itself is walked through `Tensor` handles.
pub type NodeId = *const RwLock<TensorData>;

impl Tensor {
    pub fn node_id(&self) -> NodeId {
        Arc::as_ptr(&self.data)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Topologically sorts the subgraph reachable from `root` through nodes requiring grad.
///
/// Leaves come first and `root` last. Iterative DFS, so deep graphs do not overflow the stack.
pub(crate) fn topological_sort(root: &Tensor) -> Result<Vec<Tensor>, NeuraRustError> {
    let mut order = Vec::new();
    let mut marks: HashMap<NodeId, Mark> = HashMap::new();
    let mut stack: Vec<(Tensor, bool)> = vec![(root.clone(), false)];

    while let Some((node, children_done)) = stack.pop() {
        let id = node.node_id();
        if children_done {
            marks.insert(id, Mark::Done);
            order.push(node);
            continue;
        }
        match marks.get(&id) {
            Some(Mark::Done) => continue,
            // Anything popped while a node is Visiting lies below it.
            Some(Mark::Visiting) => return Err(NeuraRustError::CycleDetected),
            None => {}
        }
        marks.insert(id, Mark::Visiting);
        let grad_fn = node.grad_fn();
        stack.push((node, true));
        if let Some(op) = grad_fn {
            for input in op.inputs() {
                if input.requires_grad() && marks.get(&input.node_id()) != Some(&Mark::Done) {
                    stack.push((input, false));
                }
            }
        }
    }
    Ok(order)
}

/// Walks the graph from `root` in reverse topological order, calling `on_node` with every
/// node's total gradient before it is propagated to the node's inputs.
///
/// Runs with graph recording disabled, so the gradients themselves carry no history.
fn propagate<S>(root: &Tensor, root_grad: Tensor, mut on_node: S) -> Result<(), NeuraRustError>
where
    S: FnMut(&Tensor, &Tensor) -> Result<(), NeuraRustError>,
{
    let _no_grad = NoGradGuard::new();
    let order = topological_sort(root)?;
    log::trace!("autograd: propagating through {} nodes", order.len());

    let mut grads: HashMap<NodeId, Tensor> = HashMap::new();
    grads.insert(root.node_id(), root_grad);

    for node in order.iter().rev() {
        let Some(node_grad) = grads.remove(&node.node_id()) else {
            continue;
        };
        on_node(node, &node_grad)?;

        let Some(op) = node.grad_fn() else {
            continue;
        };
        let inputs = op.inputs();
        let input_grads = op.backward(&node_grad)?;
        if input_grads.len() != inputs.len() {
            return Err(NeuraRustError::BackwardError(format!(
                "BackwardOp returned {} gradients, but expected {} (for op: {:?})",
                input_grads.len(),
                inputs.len(),
                op
            )));
        }

        for (input, grad_to_add) in inputs.iter().zip(input_grads) {
            if !input.requires_grad() {
                continue;
            }
            let input_shape = input.shape();
            if grad_to_add.shape() != input_shape {
                return Err(NeuraRustError::ShapeMismatch {
                    expected: input_shape,
                    actual: grad_to_add.shape(),
                    operation: format!("gradient propagation through {:?}", op),
                });
            }
            let id = input.node_id();
            let accumulated = match grads.remove(&id) {
                Some(existing) => add_op(&existing, &grad_to_add)?,
                None => grad_to_add,
            };
            grads.insert(id, accumulated);
        }
    }
    Ok(())
}

fn initial_grad(root: &Tensor, gradient: Option<Tensor>) -> Result<Tensor, NeuraRustError> {
    match gradient {
        Some(g) => {
            if g.shape() != root.shape() {
                return Err(NeuraRustError::ShapeMismatch {
                    expected: root.shape(),
                    actual: g.shape(),
                    operation: "backward initial gradient".to_string(),
                });
            }
            Ok(g.detach())
        }
        None => {
            if root.numel() != 1 {
                return Err(NeuraRustError::BackwardNonScalar);
            }
            crate::tensor::ones(&root.shape())
        }
    }
}

/// Runs the backward pass from `root`, accumulating gradients into the `.grad` of every
/// reachable leaf that requires grad.
pub(crate) fn backward(root: &Tensor, gradient: Option<Tensor>) -> Result<(), NeuraRustError> {
    let grad_init = initial_grad(root, gradient)?;
    propagate(root, grad_init, |node, node_grad| {
        if node.grad_fn().is_none() {
            node.acc_grad(node_grad.clone())?;
        }
        Ok(())
    })
}

/// Computes and returns the gradients of `output` with respect to `inputs`.
///
/// Unlike [`Tensor::backward`], nothing is written to any `.grad` field. Inputs that
/// `output` does not depend on receive a zero gradient.
///
/// # Errors
/// `RequiresGradNotMet` if `output` is not part of a graph, `BackwardNonScalar` if
/// `grad_output` is omitted for a non-scalar `output`.
pub fn grad(
    output: &Tensor,
    inputs: &[Tensor],
    grad_output: Option<Tensor>,
) -> Result<Vec<Tensor>, NeuraRustError> {
    if !output.requires_grad() {
        return Err(NeuraRustError::RequiresGradNotMet);
    }
    let grad_init = initial_grad(output, grad_output)?;

    let wanted: HashMap<NodeId, usize> = inputs
        .iter()
        .enumerate()
        .map(|(i, t)| (t.node_id(), i))
        .collect();
    let mut found: Vec<Option<Tensor>> = vec![None; inputs.len()];

    propagate(output, grad_init, |node, node_grad| {
        if let Some(&slot) = wanted.get(&node.node_id()) {
            found[slot] = Some(node_grad.clone());
        }
        Ok(())
    })?;

    found
        .into_iter()
        .zip(inputs.iter())
        .map(|(g, input)| match g {
            Some(g) => Ok(g),
            None => zeros_like(input),
        })
        .collect()
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
