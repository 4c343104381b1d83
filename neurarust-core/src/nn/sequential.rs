use crate::error::NeuraRustError;
use crate::nn::module::Module;
use crate::nn::parameter::Parameter;
use crate::tensor::Tensor;

/// Chains named modules; the output of each is the input of the next.
#[derive(Debug, Default)]
pub struct Sequential {
    modules: Vec<(String, Box<dyn Module>)>,
}

impl Sequential {
    pub fn new() -> Self {
        Sequential {
            modules: Vec::new(),
        }
    }

    pub fn add_module(&mut self, name: &str, module: Box<dyn Module>) {
        self.modules.push((name.to_string(), module));
    }

    /// Builder-style variant of [`Sequential::add_module`].
    pub fn with(mut self, name: &str, module: impl Module + 'static) -> Self {
        self.add_module(name, Box::new(module));
        self
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl Module for Sequential {
    fn forward(&self, input: &Tensor) -> Result<Tensor, NeuraRustError> {
        let mut current_input = input.clone();
        for (_, module) in &self.modules {
            current_input = module.forward(&current_input)?;
        }
        Ok(current_input)
    }

    fn parameters(&self) -> Vec<&Parameter> {
        self.modules
            .iter()
            .flat_map(|(_, module)| module.parameters())
            .collect()
    }

    fn named_parameters(&self) -> Vec<(String, &Parameter)> {
        let mut params = Vec::new();
        for (name, module) in &self.modules {
            for (param_name, param) in module.named_parameters() {
                params.push((format!("{}.{}", name, param_name), param));
            }
        }
        params
    }
}

#[cfg(test)]
#[path = "sequential_test.rs"]
mod tests;
