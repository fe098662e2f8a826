use kmt_core::application::Application;
use kmt_tracker::router;

fn main() {
    kmt_axum::Cluster::boot().register(router::routes()).run()
}
