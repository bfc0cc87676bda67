mod test_control_flow;
mod test_source_reconstruction;
