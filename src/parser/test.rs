use pretty_assertions::assert_eq;

use super::tokenizer::{Literal, Token, TokenType as TT};
use super::{parse, tokenize_string, Error, Location, Statement};

fn parse_string(input: &str) -> (Vec<Statement>, Vec<Error>) {
    let (tokens, mut errors) = tokenize_string(input);
    let (tree, syntax_errors) = parse(&tokens);
    errors.extend(syntax_errors);
    (tree, errors)
}

fn token_types(input: &str) -> Vec<TT> {
    let (tokens, errors) = tokenize_string(input);
    assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    tokens.into_iter().map(|t| t.typ).collect()
}

fn parse_tree_matches(input: &str, tree_repr: &str) {
    let (tree, errors) = parse_string(input);
    assert!(errors.is_empty(), "\nFailed to parse \"{}\": {:?}\n", input, errors);
    let result_repr = tree
        .iter()
        .map(|statement| statement.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    assert_eq!(tree_repr, result_repr, "\nwhile parsing \"{}\"", input);
}

fn assert_raises_error(input: &str, msg: &str) {
    let (_, errors) = parse_string(input);
    assert!(!errors.is_empty(), "\"{}\" parsed without errors", input);
    assert_eq!(msg, errors[0].message.as_str());
}

// # TOKENIZER
// # =========

#[test]
fn test_punctuation_and_operators() {
    assert_eq!(
        token_types("( ) { } , . - + ; / * ? :"),
        vec![
            TT::LPAR,
            TT::RPAR,
            TT::LBRACE,
            TT::RBRACE,
            TT::COMMA,
            TT::DOT,
            TT::MINUS,
            TT::PLUS,
            TT::SEMI,
            TT::SLASH,
            TT::STAR,
            TT::QUESTION,
            TT::COLON,
            TT::ENDMARKER,
        ]
    );
    assert_eq!(
        token_types("! != = == > >= < <="),
        vec![
            TT::EXCLAMATION,
            TT::NOTEQUAL,
            TT::EQUAL,
            TT::EQEQUAL,
            TT::GREATER,
            TT::GREATEREQUAL,
            TT::LESS,
            TT::LESSEQUAL,
            TT::ENDMARKER,
        ]
    );
}

#[test]
fn test_keywords_and_names() {
    assert_eq!(
        token_types("var variable while _while and or2 nil"),
        vec![
            TT::VAR,
            TT::NAME,
            TT::WHILE,
            TT::NAME,
            TT::AND,
            TT::NAME,
            TT::NIL,
            TT::ENDMARKER,
        ]
    );
}

#[test]
fn test_number_literals() {
    let (tokens, _) = tokenize_string("12 3.25 7.");
    assert_eq!(
        tokens,
        vec![
            Token::new(TT::NUMBER, "12", Some(Literal::Number(12.0)), 1),
            Token::new(TT::NUMBER, "3.25", Some(Literal::Number(3.25)), 1),
            Token::new(TT::NUMBER, "7", Some(Literal::Number(7.0)), 1),
            Token::new(TT::DOT, ".", None, 1),
            Token::new(TT::ENDMARKER, "", None, 1),
        ]
    );
}

#[test]
fn test_string_literals() {
    let (tokens, errors) = tokenize_string("\"multi\nline\" \"\"");
    assert!(errors.is_empty());
    assert_eq!(tokens[0].lexeme, "\"multi\nline\"");
    assert_eq!(
        tokens[0].literal,
        Some(Literal::String("multi\nline".to_string()))
    );
    assert_eq!(tokens[0].line, 2);
    assert_eq!(tokens[1].literal, Some(Literal::String(String::new())));
    assert_eq!(tokens[2].typ, TT::ENDMARKER);
    assert_eq!(tokens[2].line, 2);
}

#[test]
fn test_comments() {
    assert_eq!(
        token_types("1 // two\n/* three /* nested */ still\n comment */ 4"),
        vec![TT::NUMBER, TT::NUMBER, TT::ENDMARKER]
    );
    let (tokens, _) = tokenize_string("/* a\nb */\n// c\nx");
    assert_eq!(tokens[0].line, 4);
}

#[test]
fn test_lexical_errors_do_not_stop_scanning() {
    let (tokens, errors) = tokenize_string("1 @ 2\n# 3");
    assert_eq!(
        errors,
        vec![
            Error::new(1, "Unexpected character."),
            Error::new(2, "Unexpected character."),
        ]
    );
    let types: Vec<TT> = tokens.iter().map(|t| t.typ).collect();
    assert_eq!(types, vec![TT::NUMBER, TT::NUMBER, TT::NUMBER, TT::ENDMARKER]);
}

#[test]
fn test_unterminated_literals() {
    let (tokens, errors) = tokenize_string("print \"open");
    assert_eq!(errors, vec![Error::new(1, "Unterminated string.")]);
    assert_eq!(tokens.len(), 2);

    let (_, errors) = tokenize_string("/* outer /* inner */\n");
    assert_eq!(errors, vec![Error::new(2, "Unterminated block comment.")]);
}

#[test]
fn test_unicode_inside_strings() {
    let (tokens, errors) = tokenize_string("\"héllo ✓\"");
    assert!(errors.is_empty());
    assert_eq!(
        tokens[0].literal,
        Some(Literal::String("héllo ✓".to_string()))
    );
}

// # EXPRESSIONS
// # ===========

#[test]
fn test_precedence() {
    parse_tree_matches("1 + 2 * 3;", "(; (+ 1 (* 2 3)))");
    parse_tree_matches("(1 + 2) * 3;", "(; (* (group (+ 1 2)) 3))");
    parse_tree_matches("1 - 2 - 3;", "(; (- (- 1 2) 3))");
    parse_tree_matches("1 < 2 == 3 >= 4;", "(; (== (< 1 2) (>= 3 4)))");
    parse_tree_matches("-1 * !x;", "(; (* (- 1) (! x)))");
    parse_tree_matches("a or b and c;", "(; (or a (and b c)))");
    parse_tree_matches("a == b and c != d;", "(; (and (== a b) (!= c d)))");
}

#[test]
fn test_literals() {
    parse_tree_matches(
        "print \"s\"; print 1.5; print true; print false; print nil;",
        "(print \"s\") (print 1.5) (print true) (print false) (print nil)",
    );
}

#[test]
fn test_conditional_is_right_associative() {
    parse_tree_matches("a ? b : c ? d : e;", "(; (?: a b (?: c d e)))");
    parse_tree_matches("x = a or b ? 1 : 2;", "(; (= x (?: (or a b) 1 2)))");
}

#[test]
fn test_assignment_is_right_associative() {
    parse_tree_matches("a = b = 3;", "(; (= a (= b 3)))");
}

#[test]
fn test_comma() {
    parse_tree_matches("1, 2, 3;", "(; (, (, 1 2) 3))");
    parse_tree_matches("print a = 1, a + 1;", "(print (, (= a 1) (+ a 1)))");
}

#[test]
fn test_unary_takes_a_primary() {
    assert_raises_error("--1;", "Expected expression.");
}

#[test]
fn test_invalid_assignment_target() {
    let (tree, errors) = parse_string("1 + 2 = 3;");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "Invalid assignment target.");
    assert_eq!(errors[0].location, Location::At("=".to_string()));
    // The statement itself survives.
    assert_eq!(tree.len(), 1);
}

#[test]
fn test_missing_left_operand() {
    assert_raises_error("== 1;", "Missing left-hand operand.");
    assert_raises_error("+ 2;", "Missing left-hand operand.");
    assert_raises_error("* 3;", "Missing left-hand operand.");
    assert_raises_error("<= 4;", "Missing left-hand operand.");
    let (tree, errors) = parse_string("print / 2 + 3; print 4;");
    assert_eq!(errors.len(), 1);
    assert_eq!(tree.len(), 1);
}

#[test]
fn test_expected_expression() {
    assert_raises_error("print ;", "Expected expression.");
    assert_raises_error("(1 + 2;", "Expected ')' after expression.");
    assert_raises_error("true ? 1;", "Expected ':' after then branch of conditional expression.");
    assert_raises_error("return 1;", "Expected expression.");
}

// # STATEMENTS
// # ==========

#[test]
fn test_statements() {
    parse_tree_matches("var a; var b = 2;", "(var a) (var b 2)");
    parse_tree_matches("{ var a = 1; print a; }", "(block (var a 1) (print a))");
    parse_tree_matches("{}", "(block)");
    parse_tree_matches(
        "if (a) print 1; else print 2;",
        "(if a (print 1) (print 2))",
    );
    parse_tree_matches("if (a) if (b) x; else y;", "(if a (if b (; x) (; y)))");
    parse_tree_matches(
        "while (i < 3) { i = i + 1; }",
        "(while (< i 3) (block (; (= i (+ i 1)))))",
    );
}

#[test]
fn test_missing_semicolons() {
    assert_raises_error("print 1", "Expected ';' after value.");
    assert_raises_error("1 + 2", "Expected ';' after expression.");
    assert_raises_error("var a = 1", "Expected ';' after variable declaration.");
    assert_raises_error("var 1;", "Expected variable name.");
    assert_raises_error("if a) x;", "Expected '(' after 'if'.");
    assert_raises_error("if (a x;", "Expected ')' after if condition.");
    assert_raises_error("while a) x;", "Expected '(' after 'while'.");
    assert_raises_error("while (a x;", "Expected ')' after condition.");
    assert_raises_error("{ print 1;", "Expected '}' after block.");
}

#[test]
fn test_error_location() {
    let (_, errors) = parse_string("print 1\n");
    assert_eq!(errors[0].location, Location::AtEnd);
    assert_eq!(errors[0].to_string(), "[line 2] Error at end: Expected ';' after value.");

    let (_, errors) = parse_string("var x = ;");
    assert_eq!(
        errors[0].to_string(),
        "[line 1] Error at ';': Expected expression."
    );
}

#[test]
fn test_recovers_across_statements() {
    let (tree, errors) = parse_string("print 1 +;\nvar = 2;\nprint 3;");
    assert_eq!(
        errors
            .iter()
            .map(|e| (e.line, e.message.as_str()))
            .collect::<Vec<_>>(),
        vec![(1, "Expected expression."), (2, "Expected variable name.")]
    );
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].to_string(), "(print 3)");
}

#[test]
fn test_recovers_at_statement_keyword() {
    let (tree, errors) = parse_string("var x = 1 2 print 3;");
    assert_eq!(errors.len(), 1);
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].to_string(), "(print 3)");
}

#[test]
fn test_recovers_inside_block() {
    let (tree, errors) = parse_string("{ print ; print 1; } print 2;");
    assert_eq!(errors.len(), 1);
    assert_eq!(tree.len(), 2);
    assert_eq!(tree[0].to_string(), "(block (print 1))");
}

#[test]
fn test_parse_without_endmarker() {
    let (tokens, _) = tokenize_string("print 1;");
    let (tree, errors) = parse(&tokens[..tokens.len() - 1]);
    assert!(errors.is_empty());
    assert_eq!(tree.len(), 1);
    assert_eq!(parse(&[]), (vec![], vec![]));
}
