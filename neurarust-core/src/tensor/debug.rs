// src/tensor/debug.rs
use crate::tensor::Tensor;
use std::fmt;

const PREVIEW_LEN: usize = 8;

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data.read() {
            Ok(guard) => {
                let preview: Vec<f32> = guard.buffer.iter().take(PREVIEW_LEN).copied().collect();
                let ellipsis = if guard.buffer.len() > PREVIEW_LEN { ", ..." } else { "" };
                write!(
                    f,
                    "Tensor(shape={:?}, data={:?}{}, requires_grad={}, has_grad={}, has_grad_fn={})",
                    guard.shape,
                    preview,
                    ellipsis,
                    guard.requires_grad,
                    guard.grad.is_some(),
                    guard.grad_fn.is_some()
                )
            }
            Err(_) => write!(f, "Tensor(Error: RwLock poisoned)"),
        }
    }
}
