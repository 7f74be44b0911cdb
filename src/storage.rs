pub mod value_tensor;
