use crate::parse_program;
use pretty_assertions::assert_eq;

fn reconstruct(input: &str) -> String {
    parse_program(input).unwrap().to_string()
}

#[test]
fn test_operators_are_parenthesized() {
    assert_eq!(reconstruct("print 1 + 2 * 3"), "print (1 + (2 * 3))\n");
    assert_eq!(reconstruct("print a < b < c"), "print (a < (b < c))\n");
}

#[test]
fn test_blocks_are_indented() {
    let input = "def f(a, b) then if a then return b else return end end";
    let expected = "\
def f(a, b) then
    if a then
        return b
    else
        return
    end
end
";
    assert_eq!(reconstruct(input), expected);
}

#[test]
fn test_for_uses_assign_binder() {
    assert_eq!(
        reconstruct("for x in xs then print x end"),
        "for x = xs then\n    print x\nend\n"
    );
}

#[test]
fn test_literals_round_out() {
    assert_eq!(
        reconstruct("x = [1.0, 'a\\n', {\"k\": null}, true]"),
        "x = [1.0, \"a\\n\", {\"k\": null}, true]\n"
    );
}

#[test]
fn test_reconstruction_reparses_to_same_tree_shape() {
    let input = "try x = d.items[0] except print not done end";
    let first = reconstruct(input);
    let second = parse_program(&first).unwrap().to_string();
    assert_eq!(first, second);
}
