mod cluster;

pub use cluster::Cluster;
