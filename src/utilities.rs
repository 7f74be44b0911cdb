pub mod banded;
