mod readme_examples;
