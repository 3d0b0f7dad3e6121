pub mod tree_timeline;
